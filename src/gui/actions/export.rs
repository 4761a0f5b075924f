// src/gui/actions/export.rs
use std::path::PathBuf;

use crate::{
    export::{self, ExportArtifact, ExportFormat},
    error::ExportError,
    file,
    gui::app::App,
};

pub fn export_field(app: &mut App, ix: usize, format: ExportFormat) {
    let built = {
        let (Some(outcome), Some(field)) = (app.outcome.as_ref(), super::field_at(app, ix)) else {
            app.status("Nothing to export");
            logd!("Export: Clicked, but field #{ix} is gone");
            return;
        };
        logf!("Export: field={} format={:?}", field.name, format);
        export::field_artifact(outcome.request.target(), field, format)
    };
    save(app, built);
}

pub fn export_all_json(app: &mut App) {
    let Some(outcome) = app.outcome.as_ref() else {
        app.status("Nothing to export");
        return;
    };
    logf!("Export: all data JSON");
    let built = export::all_data_artifact(outcome.request.target(), &outcome.payload);
    save(app, built);
}

pub fn export_workbook(app: &mut App) {
    let Some(outcome) = app.outcome.as_ref() else {
        app.status("Nothing to export");
        return;
    };
    logf!("Export: combined workbook ({} fields)", outcome.fields.len());
    let built = export::combined_workbook_artifact(outcome.request.target(), &outcome.fields);
    save(app, built);
}

/// Write into the output dir typed in the export bar.
fn save(app: &mut App, built: Result<ExportArtifact, ExportError>) {
    let res = built.and_then(|art| write_to_out_dir(app, &art));
    match res {
        Ok(path) => {
            logf!("Export: wrote {}", path.display());
            app.status(format!("Saved {}", path.display()));
        }
        Err(e) => {
            loge!("Export: failed: {e}");
            app.status(format!("Export failed: {e}"));
        }
    }
}

fn write_to_out_dir(app: &mut App, art: &ExportArtifact) -> Result<PathBuf, ExportError> {
    let export = &mut app.state.options.export;
    export.set_out_dir(&app.state.gui.out_dir_text);
    file::write_artifact(export.out_dir(), art)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::FetchOutcome, config::state::AppState, request::{FetchRequest, Target}};
    use serde_json::json;

    fn app_with_outcome(dir: &std::path::Path) -> App {
        let mut app = App::new(AppState::default());
        app.state.gui.out_dir_text = dir.to_string_lossy().into_owned();

        let request = FetchRequest::new(Target::User(9), ["followers", "status"], "t").unwrap();
        let payload = json!({"api_status": 200, "followers": [{"id": 1}], "status": "ok"});
        let fields = crate::normalize::normalize(&payload, request.fields()).unwrap();
        app.outcome = Some(FetchOutcome { request, payload, fields });
        app
    }

    #[test]
    fn field_export_lands_in_out_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_outcome(tmp.path());

        export_field(&mut app, 0, ExportFormat::Csv);

        let written = std::fs::read_to_string(tmp.path().join("user_9_followers.csv")).unwrap();
        assert_eq!(written, "id\n1\n");
        assert!(app.status_text().starts_with("Saved"));
    }

    #[test]
    fn scalar_as_csv_reports_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_outcome(tmp.path());

        export_field(&mut app, 1, ExportFormat::Csv);

        assert!(app.status_text().starts_with("Export failed"));
        assert!(!tmp.path().join("user_9_status.csv").exists());
    }

    #[test]
    fn all_data_and_workbook() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_outcome(tmp.path());

        export_all_json(&mut app);
        export_workbook(&mut app);

        assert!(tmp.path().join("user_9_all_data.json").is_file());
        assert!(tmp.path().join("user_9_all_data.xlsx").is_file());
    }
}
