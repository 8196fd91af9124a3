//! The translator window.
//!
//! Translation runs on the tokio runtime; the window polls a oneshot channel
//! each frame and shows progress until the job reports back.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use text_translator_core::{
    AppState, Clipboard, Error, Lang, LanguageOption, Result, SUPPORTED_LANGUAGES, Severity,
    TextTranslator, TranslationProgress, source_for_path,
};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

struct PendingTranslation {
    progress: Arc<TranslationProgress>,
    receiver: oneshot::Receiver<Result<String>>,
}

/// Where a background job stands when the window checks on it.
enum JobStatus {
    Running,
    Finished(Result<String>),
    /// The task went away without sending a result
    Lost,
}

fn check_job(receiver: &mut oneshot::Receiver<Result<String>>) -> JobStatus {
    match receiver.try_recv() {
        Ok(result) => JobStatus::Finished(result),
        Err(oneshot::error::TryRecvError::Empty) => JobStatus::Running,
        Err(oneshot::error::TryRecvError::Closed) => JobStatus::Lost,
    }
}

pub struct TranslatorApp {
    state: AppState,
    translator: TextTranslator,
    runtime: tokio::runtime::Runtime,
    pending: Option<PendingTranslation>,
}

impl TranslatorApp {
    pub fn new(translator: TextTranslator, runtime: tokio::runtime::Runtime) -> Self {
        Self {
            state: AppState::from_config(translator.config()),
            translator,
            runtime,
            pending: None,
        }
    }

    fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text or PDF", &["txt", "pdf"])
            .add_filter("Text files", &["txt"])
            .add_filter("PDF files", &["pdf"])
            .pick_file()
        else {
            return;
        };

        let result =
            source_for_path(&path).and_then(|source| self.state.open_file(source.as_ref()));
        if let Err(e) = result {
            report_error(&e);
        }
    }

    fn paste_from_clipboard(&mut self) {
        if let Err(e) = self.state.paste_from_clipboard(&Clipboard) {
            report_error(&e);
        }
    }

    fn start_translation(&mut self, ctx: &egui::Context) {
        let job = match self.state.prepare_translation() {
            Ok(job) => job,
            Err(e) => {
                report_error(&e);
                return;
            }
        };

        let translator = self.translator.translator();
        let blank_lines = self.translator.blank_lines();
        let progress = Arc::new(TranslationProgress::new());
        let (sender, receiver) = oneshot::channel();

        let task_progress = Arc::clone(&progress);
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = job
                .run(translator.as_ref(), blank_lines, Some(task_progress.as_ref()))
                .await;
            // The window may have closed; nothing to deliver to then
            sender.send(result).ok();
            ctx.request_repaint();
        });

        self.pending = Some(PendingTranslation { progress, receiver });
    }

    fn poll_translation(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        match check_job(&mut pending.receiver) {
            JobStatus::Running => {}
            JobStatus::Finished(Ok(text)) => {
                self.pending = None;
                info!("Translation finished ({} chars)", text.chars().count());
                self.state.finish_translation(text);
            }
            JobStatus::Finished(Err(e)) => {
                self.pending = None;
                report_error(&e);
            }
            JobStatus::Lost => {
                self.pending = None;
                error!("Translation task ended without a result");
                show_dialog(
                    MessageLevel::Error,
                    "Error",
                    "The translation stopped unexpectedly.",
                );
            }
        }
    }

    fn save_as_pdf(&self) {
        if self.state.output_text.trim().is_empty() {
            report_error(&Error::EmptyOutput);
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF files", &["pdf"])
            .set_file_name("translation.pdf")
            .save_file()
        else {
            return;
        };

        match self.translator.save_as_pdf(&self.state, &path) {
            Ok(saved) => show_dialog(
                MessageLevel::Info,
                "Saved",
                &format!("Translation saved to {}", saved.display()),
            ),
            Err(e) => report_error(&e),
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            language_combo(ui, "source_lang", "From", &mut self.state.source_lang);
            ui.add_space(12.0);
            language_combo(ui, "target_lang", "To", &mut self.state.target_lang);
        });

        ui.horizontal(|ui| {
            if ui.button("Open file").clicked() {
                self.open_file();
            }

            let idle = self.pending.is_none();
            if ui.add_enabled(idle, egui::Button::new("Translate")).clicked() {
                self.start_translation(ctx);
            }

            if ui.button("Paste from clipboard").clicked() {
                self.paste_from_clipboard();
            }

            if ui.button("Save as PDF").clicked() {
                self.save_as_pdf();
            }

            if let Some(ref pending) = self.pending {
                ui.spinner();
                ui.label(progress_label(&pending.progress));
            }
        });
    }
}

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_translation();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls(ui, ctx);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                text_panel(&mut columns[0], "input", "Input", &mut self.state.input_text);
                text_panel(&mut columns[1], "output", "Translation", &mut self.state.output_text);
            });
        });

        if self.pending.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn language_combo(ui: &mut egui::Ui, id: &str, label: &str, selected: &mut Option<Lang>) {
    ui.label(label);

    let current = selected
        .as_ref()
        .map(|lang| lang.to_string())
        .unwrap_or_default();

    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for option in SUPPORTED_LANGUAGES {
                let is_selected = selected.as_ref().is_some_and(|l| l.as_str() == option.code);
                if ui.selectable_label(is_selected, language_label(option)).clicked() {
                    *selected = Some(Lang::new(option.code));
                }
            }
        });
}

fn text_panel(ui: &mut egui::Ui, id: &str, heading: &str, text: &mut String) {
    ui.heading(heading);
    egui::ScrollArea::vertical()
        .id_salt(id)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_sized(
                ui.available_size(),
                egui::TextEdit::multiline(text).desired_width(f32::INFINITY),
            );
        });
}

fn language_label(option: &LanguageOption) -> String {
    format!("{} ({})", option.code, option.name)
}

fn progress_label(progress: &TranslationProgress) -> String {
    if progress.total() == 0 {
        "Translating...".to_string()
    } else {
        format!("{}/{} paragraphs", progress.done(), progress.total())
    }
}

const fn dialog_level(severity: Severity) -> MessageLevel {
    match severity {
        Severity::Warning => MessageLevel::Warning,
        Severity::Error => MessageLevel::Error,
    }
}

fn report_error(e: &Error) {
    let severity = e.severity();
    let title = match severity {
        Severity::Warning => {
            warn!("{}", e);
            "Warning"
        }
        Severity::Error => {
            error!("{}", e);
            "Error"
        }
    };
    show_dialog(dialog_level(severity), title, &e.to_string());
}

fn show_dialog(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
