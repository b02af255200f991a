use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use jobtrack_core::{
    update, ApiLayout, AppState, FormField, Msg, Phase, StatusMessage, UPLOAD_SLOTS,
};
use jobtrack_engine::ReqwestJobApi;
use jobtrack_logging::{jobtrack_error, jobtrack_info, jobtrack_warn};

use super::config::{self, ClientConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::{logging, ui};

pub fn run_app() -> ExitCode {
    let (config, found) = match config::load(Path::new(CONFIG_FILENAME)) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("jobtrack: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    logging::initialize(config.log_destination, config.verbose);
    if !found {
        jobtrack_warn!("No {} found; using defaults", CONFIG_FILENAME);
    }

    match run(config) {
        Ok(Phase::Completed) => ExitCode::SUCCESS,
        Ok(phase) => {
            jobtrack_info!("Session ended in {:?}", phase);
            ExitCode::FAILURE
        }
        Err(err) => {
            jobtrack_error!("{:#}", err);
            eprintln!("jobtrack: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ClientConfig) -> anyhow::Result<Phase> {
    let layout = ApiLayout::new(&config.server_url, config.endpoint_paths())
        .context("invalid server_url")?;
    let api = ReqwestJobApi::new(layout.clone(), &config.http_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    let state = AppState::new(layout, config.poll_schedule());
    let mut page = Page::new(state, EffectRunner::new(Arc::new(api)));
    runtime.block_on(page.drive(&config));
    Ok(page.phase())
}

/// Owns the single session state and renders every visible change.
struct Page {
    state: Option<AppState>,
    runner: EffectRunner,
    shown: Option<StatusMessage>,
}

impl Page {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state: Some(state),
            runner,
            shown: None,
        }
    }

    fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::Errored, AppState::phase)
    }

    async fn drive(&mut self, config: &ClientConfig) {
        for (field, value) in config.form.text_fields() {
            self.dispatch(Msg::FieldEdited { field, value });
        }

        for (slot, upload) in config.form.uploads.iter().take(UPLOAD_SLOTS).enumerate() {
            let Some(file) = upload.file.clone() else {
                continue;
            };
            self.dispatch(Msg::FileChosen {
                slot,
                path: Some(file),
            });
            self.pump_while(|state| state.view().discovering).await;
            // Choosing a file clears its column, so reapply the configured one.
            self.dispatch(Msg::FieldEdited {
                field: FormField::Column(slot),
                value: upload.column.clone(),
            });

            let Some(view) = self.state.as_ref().map(AppState::view) else {
                continue;
            };
            let options = &view.column_options[slot];
            if options.len() > 1 && !options.iter().any(|option| option.value == upload.column) {
                jobtrack_warn!(
                    "Column {:?} is not among the fields of slot {}",
                    upload.column,
                    slot
                );
            }
        }

        self.dispatch(Msg::StartClicked);
        self.pump_while(|state| !state.phase().is_settled()).await;
    }

    async fn pump_while(&mut self, waiting: impl Fn(&AppState) -> bool) {
        while self.state.as_ref().is_some_and(|state| waiting(state)) {
            match self.runner.next_msg().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for line in ui::render::render(&view, self.shown.as_ref(), Local::now()) {
                println!("{line}");
            }
            self.shown = Some(view.status);
        }
        self.state = Some(state);
        self.runner.enqueue(effects);
    }
}
