//! Chat Vibes window: egui/eframe application.
//!
//! # Architecture
//!
//! [`ChatVibesApp`] is the top-level [`eframe::App`].  It owns the transcript
//! text box and two handles into the core:
//!
//! * an `Arc<AnalysisOrchestrator>` it calls [`submit`] on, and
//! * a [`StateReceiver`] it reads once per frame.
//!
//! The app never writes lifecycle state itself; everything it shows about an
//! analysis comes from the receiver.
//!
//! # Views
//!
//! | State | Visual |
//! |-------|--------|
//! | `Idle` | Transcript box + Paste / Analyze buttons |
//! | rejected | Transcript box + "Invalid chat format" panel with an example |
//! | `Loading` | Spinner + "Reading the vibes..." |
//! | `Success` | Dashboard: metric meters, texting styles, fun stats, highlights |
//! | `Failure` | Transcript box + error banner |
//!
//! [`submit`]: AnalysisOrchestrator::submit

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;

use crate::analysis::{AnalysisResult, TextingStyle, WordFrequency};
use crate::config::AppConfig;
use crate::input::{read_clipboard, read_transcript_file};
use crate::pipeline::{AnalysisOrchestrator, AnalyzeError, LifecycleState, StateReceiver};

/// Shown in the invalid-format panel.
const EXAMPLE_LINE: &str = "[26/01/24, 10:30:45 PM] Person: Message";

const ACCENT: egui::Color32 = egui::Color32::from_rgb(108, 99, 255);
const PINK: egui::Color32 = egui::Color32::from_rgb(255, 181, 218);
const RED: egui::Color32 = egui::Color32::from_rgb(255, 107, 107);
const GREEN: egui::Color32 = egui::Color32::from_rgb(78, 205, 196);
const DIM: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

// ---------------------------------------------------------------------------
// Notice: UI-local messages that are not lifecycle state
// ---------------------------------------------------------------------------

/// Something to tell the user that did not come from an analysis.
#[derive(Debug, Clone, PartialEq)]
enum Notice {
    /// The transcript was turned away before any request was sent.
    Rejected(AnalyzeError),
    /// Paste / file drop failed.
    Input(String),
}

// ---------------------------------------------------------------------------
// ChatVibesApp
// ---------------------------------------------------------------------------

/// eframe application: the Chat Vibes analyzer window.
pub struct ChatVibesApp {
    // ── Core handles ─────────────────────────────────────────────────────
    orchestrator: Arc<AnalysisOrchestrator>,
    runtime: Handle,
    state_rx: StateReceiver,

    // ── UI state ─────────────────────────────────────────────────────────
    /// Text box contents.
    transcript: String,
    notice: Option<Notice>,
    /// Request whose results the user closed with "Analyze another chat".
    dismissed_request: Option<u64>,
    show_settings: bool,

    /// Application configuration (read-only after startup).
    config: AppConfig,
}

impl ChatVibesApp {
    /// Create a new [`ChatVibesApp`].
    ///
    /// * `orchestrator`: shared analysis orchestrator.
    /// * `runtime`: tokio runtime the remote calls are spawned on.
    /// * `config`: loaded application configuration.
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, runtime: Handle, config: AppConfig) -> Self {
        let state_rx = orchestrator.subscribe();
        Self {
            orchestrator,
            runtime,
            state_rx,
            transcript: String::new(),
            notice: None,
            dismissed_request: None,
            show_settings: false,
            config,
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn analyze(&mut self) {
        match self.orchestrator.submit(&self.runtime, &self.transcript) {
            Ok(_task) => {
                self.notice = None;
                self.dismissed_request = None;
            }
            Err(AnalyzeError::EmptyTranscript) => {
                // Nothing to analyse; ignore the click.
                self.notice = None;
            }
            Err(err) => {
                self.notice = Some(Notice::Rejected(err));
            }
        }
    }

    fn paste(&mut self) {
        match read_clipboard() {
            Ok(Some(text)) => {
                self.transcript = text;
                self.notice = None;
            }
            Ok(None) => {
                self.notice = Some(Notice::Input("the clipboard has no text".into()));
            }
            Err(err) => {
                log::warn!("paste failed: {err}");
                self.notice = Some(Notice::Input(err.to_string()));
            }
        }
    }

    /// Load the first dropped `.txt` file into the text box.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let loaded = match (&file.path, &file.bytes) {
            (Some(path), _) => read_transcript_file(path).map_err(|e| e.to_string()),
            (None, Some(bytes)) => String::from_utf8(bytes.to_vec())
                .map_err(|_| format!("{} is not UTF-8 text", file.name)),
            (None, None) => Err(format!("{} could not be read", file.name)),
        };

        match loaded {
            Ok(text) => {
                log::info!("loaded transcript from dropped file ({} bytes)", text.len());
                self.transcript = text;
                self.notice = None;
            }
            Err(message) => {
                log::warn!("file drop rejected: {message}");
                self.notice = Some(Notice::Input(message));
            }
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui, state: &LifecycleState) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Chat Vibes").strong());
            ui.label(egui::RichText::new("Relationship Analyzer").color(ACCENT));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("=").clicked() {
                    self.show_settings = !self.show_settings;
                }
                ui.label(egui::RichText::new(state.label()).color(DIM).size(11.0));
            });
        });
    }

    fn draw_settings(&self, ui: &mut egui::Ui) {
        let llm = &self.config.llm;
        egui::Grid::new("settings").num_columns(2).show(ui, |ui| {
            ui.label("Provider");
            ui.label(format!("{:?}", llm.provider));
            ui.end_row();
            ui.label("Model");
            ui.label(llm.model.as_str());
            ui.end_row();
            ui.label("Endpoint");
            ui.label(llm.base_url.as_str());
            ui.end_row();
            ui.label("API key");
            ui.label(if llm.resolved_api_key().is_some() {
                "configured".to_string()
            } else {
                format!("missing (set {})", llm.api_key_env)
            });
            ui.end_row();
            ui.label("Lines checked");
            ui.label(self.config.validation.prefix_lines.to_string());
            ui.end_row();
        });
    }

    fn draw_input(&mut self, ui: &mut egui::Ui, failure: Option<&str>) {
        if let Some(message) = failure {
            banner(ui, RED, &format!("Analysis failed: {message}"));
        }

        match self.notice.clone() {
            Some(Notice::Rejected(AnalyzeError::FormatRejected)) => {
                self.draw_invalid_format(ui);
                return;
            }
            Some(Notice::Rejected(err)) => banner(ui, RED, &err.to_string()),
            Some(Notice::Input(message)) => banner(ui, RED, &message),
            None => {}
        }

        ui.label(
            egui::RichText::new("Paste an exported WhatsApp chat, or drop the .txt file here.")
                .color(DIM),
        );
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 48.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.transcript)
                        .hint_text(EXAMPLE_LINE)
                        .desired_rows(18)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
            });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Paste").clicked() {
                self.paste();
            }
            if ui.button("Clear").clicked() {
                self.transcript.clear();
                self.notice = None;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let analyze = egui::Button::new(
                    egui::RichText::new("Analyze the vibes").strong().color(egui::Color32::WHITE),
                )
                .fill(ACCENT);
                if ui
                    .add_enabled(!self.transcript.trim().is_empty(), analyze)
                    .clicked()
                {
                    self.analyze();
                }
            });
        });
    }

    fn draw_invalid_format(&mut self, ui: &mut egui::Ui) {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("!").size(32.0).color(RED));
            ui.heading("Invalid Chat Format");
            ui.label("Please make sure you're using the WhatsApp chat export format.");
            ui.label(egui::RichText::new(format!("Example: {EXAMPLE_LINE}")).monospace());
            ui.add_space(8.0);
            if ui.button("Try Again").clicked() {
                self.notice = None;
            }
        });
    }

    fn draw_loading(&self, ui: &mut egui::Ui) {
        ui.add_space(80.0);
        ui.vertical_centered(|ui| {
            ui.add(egui::Spinner::new().size(32.0).color(ACCENT));
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Reading the vibes...").color(ACCENT).size(16.0));
        });
    }

    fn draw_results(&mut self, ui: &mut egui::Ui, request_id: u64, result: &AnalysisResult) {
        ui.horizontal(|ui| {
            if ui.button("Analyze another chat").clicked() {
                self.dismissed_request = Some(request_id);
            }
        });
        ui.add_space(4.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            draw_dashboard(ui, result);
        });
    }
}

// ---------------------------------------------------------------------------
// Dashboard rendering
// ---------------------------------------------------------------------------

fn draw_dashboard(ui: &mut egui::Ui, result: &AnalysisResult) {
    let people = &result.participants;
    let name1 = people.display_name("person1").to_string();
    let name2 = people.display_name("person2").to_string();

    section(ui, "Mood Meter", |ui| {
        let mood = &result.mood_metrics;
        meter(ui, "Happy", mood.happy, GREEN);
        meter(ui, "Neutral", mood.neutral, DIM);
        meter(ui, "Sad", mood.sad, ACCENT);
    });

    section(ui, "Relationship", |ui| {
        let rel = &result.relationship_metrics;
        meter(ui, "Compatibility", rel.compatibility_score, PINK);
        meter(ui, "Breakup probability", rel.breakup_probability, RED);
        meter(ui, "Banter level", rel.banter_level, ACCENT);
        meter(ui, "Flirt score", rel.flirt_score, PINK);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Red flags: {}", rel.red_flags)).color(RED));
            ui.add_space(16.0);
            ui.label(egui::RichText::new(format!("Green flags: {}", rel.green_flags)).color(GREEN));
        });
    });

    section(ui, "Conversation Flow", |ui| {
        let flow = &result.conversation_flow;
        meter(ui, "Dry texting", flow.dry_texting, DIM);
        meter(ui, "Excitement", flow.excitement_level, GREEN);
        meter(ui, "Mutual interest", flow.mutual_interest, PINK);
        meter(ui, "Topic variety", flow.topic_variety, ACCENT);
    });

    section(ui, "Texting Styles", |ui| {
        let styles = &result.texting_styles;
        egui::Grid::new("texting_styles")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                ui.label("");
                ui.strong(name1.as_str());
                ui.strong(name2.as_str());
                ui.end_row();
                style_row(ui, "Enthusiasm", &styles.person1, &styles.person2, |s| {
                    format!("{:.0}%", s.enthusiasm)
                });
                style_row(ui, "Response time", &styles.person1, &styles.person2, |s| {
                    format!("{}", s.response_time)
                });
                style_row(ui, "Emoji usage", &styles.person1, &styles.person2, |s| {
                    format!("{:.0}%", s.emoji_usage)
                });
                style_row(ui, "Text length", &styles.person1, &styles.person2, |s| {
                    or_dash(&s.text_length).to_string()
                });
                style_row(ui, "Ghosting", &styles.person1, &styles.person2, |s| {
                    format!("{:.0}%", s.ghosting_score)
                });
                style_row(ui, "Top emojis", &styles.person1, &styles.person2, emoji_summary);
            });
    });

    section(ui, "Fun Stats", |ui| {
        let fun = &result.fun_stats;
        egui::Grid::new("fun_stats").num_columns(2).show(ui, |ui| {
            for (question, answer) in [
                ("Who texted first?", &fun.who_texted_first),
                ("Who sends more emojis?", &fun.who_sends_more_emojis),
                ("Who ghosts more?", &fun.who_ghosts_more),
                ("Who is more clingy?", &fun.who_is_more_clingy),
            ] {
                ui.label(question);
                ui.strong(or_dash(people.display_name(answer)));
                ui.end_row();
            }
        });
    });

    section(ui, "Reply Speed", |ui| {
        let speed = &result.reply_speed;
        egui::Grid::new("reply_speed").num_columns(2).show(ui, |ui| {
            for (label, value) in [
                ("Average", &speed.average),
                ("Fastest", &speed.fastest),
                ("Slowest", &speed.slowest),
            ] {
                ui.label(label);
                ui.strong(or_dash(value));
                ui.end_row();
            }
        });
    });

    section(ui, "Media Shared", |ui| {
        let media = &result.media;
        ui.horizontal(|ui| {
            ui.label(format!("GIFs: {}", media.gifs));
            ui.add_space(16.0);
            ui.label(format!("Images: {}", media.images));
            ui.add_space(16.0);
            ui.label(format!("Videos: {}", media.videos));
        });
    });

    if !result.pet_names.is_empty() {
        section(ui, "Pet Names", |ui| {
            ui.horizontal_wrapped(|ui| {
                for name in &result.pet_names {
                    ui.label(egui::RichText::new(name.as_str()).color(PINK));
                }
            });
        });
    }

    if !result.inside_jokes.is_empty() {
        section(ui, "Inside Jokes", |ui| {
            for joke in &result.inside_jokes {
                ui.label(format!("\u{201c}{joke}\u{201d}"));
            }
        });
    }

    if !result.debates.is_empty() {
        section(ui, "Debates", |ui| {
            for debate in &result.debates {
                meter(ui, or_dash(&debate.topic), debate.intensity, RED);
            }
        });
    }

    if !result.compliments.is_empty() {
        section(ui, "Compliments", |ui| {
            for c in &result.compliments {
                ui.label(format!("{} → {}: {}", or_dash(&c.from), or_dash(&c.to), c.text));
            }
        });
    }

    if !result.apologies.is_empty() {
        section(ui, "Apologies", |ui| {
            for a in &result.apologies {
                ui.label(format!("{} → {}: {}", or_dash(&a.from), or_dash(&a.to), a.reason));
            }
        });
    }

    if !result.memory_lane.is_empty() {
        section(ui, "Memory Lane", |ui| {
            egui::Grid::new("memory_lane").num_columns(2).show(ui, |ui| {
                for memory in &result.memory_lane {
                    ui.strong(or_dash(&memory.date));
                    ui.label(memory.event.as_str());
                    ui.end_row();
                }
            });
        });
    }

    if !result.word_cloud.is_empty() {
        section(ui, "Most Used Words", |ui| {
            ui.label(top_words(&result.word_cloud, 10));
        });
    }
}

fn section(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
    ui.add_space(6.0);
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title).strong().size(15.0).color(ACCENT));
            ui.add_space(4.0);
            body(ui);
        });
}

fn meter(ui: &mut egui::Ui, label: &str, value: f64, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized([150.0, 18.0], egui::Label::new(label));
        ui.add(
            egui::ProgressBar::new(percent_fraction(value))
                .fill(color)
                .text(format!("{value:.0}%")),
        );
    });
}

fn style_row(
    ui: &mut egui::Ui,
    label: &str,
    a: &TextingStyle,
    b: &TextingStyle,
    render: impl Fn(&TextingStyle) -> String,
) {
    ui.label(label);
    ui.label(render(a));
    ui.label(render(b));
    ui.end_row();
}

fn banner(ui: &mut egui::Ui, color: egui::Color32, message: &str) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(message).color(color));
        });
    ui.add_space(6.0);
}

/// Map a 0–100 score onto a progress-bar fraction.
fn percent_fraction(value: f64) -> f32 {
    if value.is_finite() {
        (value / 100.0).clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Up to three emojis, most used first, e.g. `"😂×12 ❤️×4"`.
fn emoji_summary(style: &TextingStyle) -> String {
    let mut stats: Vec<_> = style.emoji_stats.iter().filter(|e| e.count > 0).collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    let summary: Vec<String> = stats
        .into_iter()
        .take(3)
        .map(|e| format!("{}×{}", e.emoji, e.count))
        .collect();
    if summary.is_empty() {
        "-".to_string()
    } else {
        summary.join(" ")
    }
}

/// The `limit` most frequent words, e.g. `"lol (42) · haha (17)"`.
fn top_words(words: &[WordFrequency], limit: usize) -> String {
    let mut words: Vec<_> = words.iter().filter(|w| !w.word.trim().is_empty()).collect();
    words.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    let summary: Vec<String> = words
        .into_iter()
        .take(limit)
        .map(|w| format!("{} ({})", w.word, w.frequency))
        .collect();
    if summary.is_empty() {
        "-".to_string()
    } else {
        summary.join(" · ")
    }
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ChatVibesApp {
    /// Called every frame by eframe.  Reads the latest snapshot, handles
    /// dropped files, then renders the view for the current state.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.state_rx.borrow_and_update().clone();

        // The orchestrator finishes on a tokio worker; poll while it runs.
        if snapshot.state.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            self.handle_dropped_files(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui, &snapshot.state);
            ui.separator();

            if self.show_settings {
                self.draw_settings(ui);
                ui.separator();
            }

            match &snapshot.state {
                LifecycleState::Loading => self.draw_loading(ui),
                LifecycleState::Success(result)
                    if self.dismissed_request != Some(snapshot.request_id) =>
                {
                    self.draw_results(ui, snapshot.request_id, result);
                }
                LifecycleState::Failure(detail) => {
                    let message = detail.message.clone();
                    self.draw_input(ui, Some(&message));
                }
                LifecycleState::Idle | LifecycleState::Success(_) => self.draw_input(ui, None),
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Chat Vibes window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
