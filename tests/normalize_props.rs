// tests/normalize_props.rs
use std::io::{Cursor, Read};

use api_downloader::{
    NormalizeError, csv,
    export::{self, ExportFormat},
    normalize::{FieldData, NormalizedField, NormalizedTable, normalize},
    request::Target,
    workbook,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn table<'a>(fields: &'a [NormalizedField], name: &str) -> &'a NormalizedTable {
    fields
        .iter()
        .find(|f| f.name == name)
        .and_then(|f| f.table())
        .unwrap_or_else(|| panic!("no table for {name}"))
}

/// One part of an xlsx package, as text.
fn xlsx_part(bytes: &[u8], part: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut text = String::new();
    archive.by_name(part).unwrap().read_to_string(&mut text).unwrap();
    text
}

/// Sheet names from xl/workbook.xml, in tab order.
fn sheet_names(bytes: &[u8]) -> Vec<String> {
    let xml = xlsx_part(bytes, "xl/workbook.xml");
    xml.split("<sheet name=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[rstest]
#[case(json!([{"a": 1}]), "array")]
#[case(json!("oops"), "string")]
#[case(json!(42), "number")]
#[case(json!(false), "boolean")]
#[case(Value::Null, "null")]
fn non_object_payload_is_rejected(#[case] payload: Value, #[case] found: &str) {
    let err = normalize(&payload, &["user_data"]).unwrap_err();
    let NormalizeError::InvalidPayloadShape { found: got } = err;
    assert_eq!(got, found);
}

#[test]
fn absent_fields_are_skipped() {
    let payload = json!({"api_status": 200, "followers": []});
    let out = normalize(&payload, &["liked_pages", "followers", "joined_groups"]).unwrap();
    let names: Vec<&str> = out.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["followers"]);
}

#[test]
fn empty_list_is_empty_table_and_empty_csv() {
    let payload = json!({"followers": []});
    let out = normalize(&payload, &["followers"]).unwrap();
    let t = table(&out, "followers");
    assert_eq!(t.nrows(), 0);
    assert_eq!(t.ncols(), 0);
    assert!(csv::to_csv_bytes(t).is_empty());
    assert_eq!(serde_json::to_value(t).unwrap(), json!([]));
}

#[test]
fn ragged_rows_are_padded() {
    let payload = json!({
        "followers": [
            {"id": 1, "name": "ann"},
            {"id": 2, "avatar": "a.png"},
            {"name": "cy", "id": 3, "bio": null},
        ]
    });
    let out = normalize(&payload, &["followers"]).unwrap();
    let t = table(&out, "followers");

    assert_eq!(t.columns(), &["id", "name", "avatar", "bio"]);
    assert!(t.rows().iter().all(|r| r.len() == t.ncols()));

    let text = csv::to_csv_string(t);
    assert_eq!(text, "id,name,avatar,bio\n1,ann,,\n2,,a.png,\n3,cy,,\n");

    // CSV parses back to the same grid shape.
    let parsed = csv::parse_rows(&text, csv::SEP);
    assert_eq!(parsed.len(), 1 + t.nrows());
    assert!(parsed.iter().all(|r| r.len() == t.ncols()));
}

#[test]
fn single_mapping_is_one_row() {
    let payload = json!({"user_data": {"user_id": 9, "username": "zed", "verified": true}});
    let out = normalize(&payload, &["user_data"]).unwrap();
    let t = table(&out, "user_data");
    assert_eq!(t.nrows(), 1);
    assert_eq!(t.columns(), &["user_id", "username", "verified"]);
    assert_eq!(t.get(0, "verified"), Some(&json!(true)));
}

#[test]
fn nested_values_stay_json_in_csv() {
    let payload = json!({"user_data": {"id": 1, "tags": ["a", "b"], "geo": {"lat": 1.5}}});
    let out = normalize(&payload, &["user_data"]).unwrap();
    let text = csv::to_csv_string(table(&out, "user_data"));
    assert_eq!(text, "id,tags,geo\n1,\"[\"\"a\"\",\"\"b\"\"]\",\"{\"\"lat\"\":1.5}\"\n");
}

#[rstest]
#[case(json!("active"))]
#[case(json!(17))]
#[case(json!(true))]
#[case(Value::Null)]
fn scalars_pass_through(#[case] value: Value) {
    let payload = json!({"status": value.clone()});
    let out = normalize(&payload, &["status"]).unwrap();
    assert_eq!(out.len(), 1);
    assert!(out[0].is_scalar());
    assert_eq!(out[0].data, FieldData::Scalar(value));
}

#[test]
fn normalizing_twice_gives_the_same_result() {
    let payload = json!({
        "user_data": {"id": 1},
        "followers": [{"id": 2}, {"id": 3, "x": 1}],
        "status": "ok"
    });
    let fields = ["user_data", "followers", "status"];
    let first = normalize(&payload, &fields).unwrap();
    let second = normalize(&payload, &fields).unwrap();
    assert_eq!(first, second);

    let bytes = |out: &[NormalizedField]| -> Vec<(String, Vec<u8>)> {
        export::batch_artifacts(Target::User(1), &payload, out, &ExportFormat::ALL)
            .unwrap()
            .into_iter()
            .map(|a| (a.filename, a.bytes))
            .collect()
    };
    let a = bytes(first.as_slice());
    // The workbook must not depend on the clock.
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let b = bytes(second.as_slice());

    let names: Vec<&str> = a.iter().map(|(n, _)| n.as_str()).collect();
    for ext in [".csv", ".json", ".xlsx"] {
        assert!(names.iter().any(|n| n.ends_with(ext)), "no {ext} in {names:?}");
    }
    assert_eq!(a.len(), b.len());
    for ((name, x), (_, y)) in a.iter().zip(&b) {
        assert!(x == y, "{name} differs between runs");
    }
}

#[test]
fn request_order_wins_over_payload_order() {
    let payload = json!({"a": [], "b": [], "c": []});
    let out = normalize(&payload, &["c", "a"]).unwrap();
    let names: Vec<&str> = out.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a"]);
}

#[test]
fn combined_plan_has_one_sheet_per_table() {
    let payload = json!({
        "followers": [{"id": 1}],
        "following": [],
        "status": "ok",
        "user_data": {"id": 1}
    });
    let out = normalize(&payload, &["user_data", "followers", "following", "status"]).unwrap();
    let plan = workbook::plan_combined(&out);
    let sheets: Vec<&str> = plan.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(sheets, vec!["user_data", "followers", "following"]);

    let bytes = workbook::to_combined_workbook(&out).unwrap();
    assert_eq!(sheet_names(&bytes), vec!["user_data", "followers", "following"]);
}

#[test]
fn big_ids_keep_every_digit_in_the_workbook() {
    let payload = json!({"followers": [{"id": 100004123456789013_u64, "n": 5}]});
    let out = normalize(&payload, &["followers"]).unwrap();
    let bytes = workbook::to_combined_workbook(&out).unwrap();

    let strings = xlsx_part(&bytes, "xl/sharedStrings.xml");
    assert!(strings.contains("100004123456789013"), "{strings}");
    let sheet = xlsx_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(!sheet.contains("100004123456789010"), "{sheet}");
    assert!(sheet.contains("<v>5</v>"), "{sheet}");
}

#[test]
fn history_field_gets_a_legal_sheet_name() {
    let payload = json!({"history": [{"at": 1}], "followers": []});
    let out = normalize(&payload, &["history", "followers"]).unwrap();
    let bytes = workbook::to_combined_workbook(&out).unwrap();
    assert_eq!(sheet_names(&bytes), vec!["history_", "followers"]);
}

#[test]
fn objects_without_keys_keep_rows_but_no_columns() {
    let payload = json!({"user_data": {}, "followers": [{}, {}]});
    let out = normalize(&payload, &["user_data", "followers"]).unwrap();

    let user = table(&out, "user_data");
    assert_eq!((user.nrows(), user.ncols()), (1, 0));
    assert!(csv::to_csv_bytes(user).is_empty());
    assert_eq!(serde_json::to_value(user).unwrap(), json!([{}]));

    let followers = table(&out, "followers");
    assert_eq!((followers.nrows(), followers.ncols()), (2, 0));
    assert!(csv::to_csv_bytes(followers).is_empty());
    assert_eq!(serde_json::to_value(followers).unwrap(), json!([{}, {}]));
}

#[test]
fn null_in_single_column_list_survives_csv() {
    let payload = json!({"liked_pages": ["a", null, "b"]});
    let out = normalize(&payload, &["liked_pages"]).unwrap();
    let t = table(&out, "liked_pages");

    let text = csv::to_csv_string(t);
    assert_eq!(text, "liked_pages\na\n\"\"\nb\n");
    let parsed = csv::parse_rows(&text, csv::SEP);
    assert_eq!(parsed.len(), 1 + t.nrows());
}

#[test]
fn long_field_names_do_not_collide_as_sheets() {
    let a = format!("{}_one", "very_long_field_name_prefix_xx");
    let b = format!("{}_two", "very_long_field_name_prefix_xx");
    let payload = json!({ a.clone(): [{"x": 1}], b.clone(): [{"x": 2}] });
    let out = normalize(&payload, &[a.as_str(), b.as_str()]).unwrap();
    let plan = workbook::plan_combined(&out);

    assert_eq!(plan.len(), 2);
    assert_ne!(plan[0].0.to_lowercase(), plan[1].0.to_lowercase());
    assert!(plan.iter().all(|(n, _)| n.chars().count() <= 31));
}
