//! Main application UI.
//! Renders the deck list, review sessions and stats; all state changes go
//! through the library's CardStore and ReviewSession.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use recall::database::CardStore;
use recall::export::json::{export_json_to_path, import_into};
use recall::models::progress::{achievements, goal_percent, mastery_percent, reviews_on, xp_level};
use recall::models::scheduler::due_count;
use recall::models::stats::history_key;
use recall::models::{Milestone, ReviewSession};

/// Application screen states
#[derive(Default, PartialEq)]
enum AppScreen {
    #[default]
    Main,
    Review,
    Stats,
}

/// Deck form shared by "create" and "edit".
#[derive(Default)]
struct DeckForm {
    deck_id: Option<String>,
    name: String,
    description: String,
}

/// Main application state
pub struct MyApp {
    store: CardStore,
    current_screen: AppScreen,

    session: Option<ReviewSession>,
    show_answer: bool,
    show_notes: bool,
    notes_draft: String,
    milestone: Option<Milestone>,

    new_deck: DeckForm,
    edit_deck: Option<DeckForm>,
    add_card_deck: Option<String>,
    current_question: String,
    current_answer: String,
    delete_deck: Option<String>,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_export_dialog: bool,
    show_message_dialog: bool,
    message: String,
}

fn today_key() -> String {
    history_key(Local::now().date_naive())
}

/// Formats a review time as local `YYYY-MM-DD HH:MM`
fn format_review_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
            AppScreen::Stats => self.render_stats_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                        }
                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        self.render_dialogs(ctx);
    }
}

impl MyApp {
    pub fn new(store: CardStore) -> Self {
        Self {
            store,
            current_screen: AppScreen::Main,
            session: None,
            show_answer: false,
            show_notes: false,
            notes_draft: String::new(),
            milestone: None,
            new_deck: DeckForm::default(),
            edit_deck: None,
            add_card_deck: None,
            current_question: String::new(),
            current_answer: String::new(),
            delete_deck: None,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_export_dialog: false,
            show_message_dialog: false,
            message: String::new(),
        }
    }

    fn show_message(&mut self, message: String) {
        self.message = message;
        self.show_message_dialog = true;
    }

    /// Renders the main screen: progress summary and deck management
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        let today = today_key();
        let now = Utc::now();

        egui::CentralPanel::default().show(ctx, |ui| {
            let stats = self.store.stats();
            let level = xp_level(stats.xp_points);
            ui.horizontal(|ui| {
                ui.heading(format!("Level {}", level.level));
                ui.label(format!("{} XP", stats.xp_points));
                ui.label(format!("🔥 {}", stats.streak));
            });
            ui.add(
                egui::ProgressBar::new(level.progress as f32 / 100.0)
                    .text(format!("{:.0}% to Level {}", level.progress, level.next_level)),
            );
            ui.label(format!(
                "Today: {} / {} reviews",
                reviews_on(stats, &today),
                stats.review_goal
            ));
            ui.add(egui::ProgressBar::new(goal_percent(stats, &today) as f32 / 100.0));

            ui.horizontal(|ui| {
                if ui.button("Review All Decks").clicked() {
                    self.start_session(None);
                }
                if ui.button("Stats").clicked() {
                    self.current_screen = AppScreen::Stats;
                }
                if ui.button("Export Deck").clicked() {
                    self.show_export_dialog = true;
                }
                if ui.button("Import Deck").clicked() {
                    self.handle_import();
                }
            });

            ui.separator();

            ui.heading("Create New Deck");
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.new_deck.name);
            });
            ui.horizontal(|ui| {
                ui.label("Description:");
                ui.text_edit_singleline(&mut self.new_deck.description);
            });
            if ui.button("Create Deck").clicked() {
                match self
                    .store
                    .create_deck(&self.new_deck.name, &self.new_deck.description)
                {
                    Ok(_) => self.new_deck = DeckForm::default(),
                    Err(e) => self.show_message(e.to_string()),
                }
            }

            ui.separator();
            ui.heading(format!("Decks ({})", self.store.decks().decks.len()));

            // We store actions to execute after UI rendering to avoid borrowing conflicts
            let mut action_learn: Option<String> = None;
            let mut action_edit: Option<DeckForm> = None;
            let mut action_add_card: Option<String> = None;
            let mut action_delete: Option<String> = None;

            egui::ScrollArea::vertical()
                .id_source("decks_list")
                .show(ui, |ui| {
                    for deck in &self.store.decks().decks {
                        ui.group(|ui| {
                            ui.strong(&deck.name);
                            if !deck.description.is_empty() {
                                ui.label(&deck.description);
                            }
                            ui.label(format!(
                                "{} cards, {} due, {} mastered",
                                deck.cards.len(),
                                due_count(&deck.cards, now),
                                deck.mastered_count()
                            ));
                            ui.horizontal(|ui| {
                                if ui.button("Review").clicked() {
                                    action_learn = Some(deck.id.clone());
                                }
                                if ui.button("Add Card").clicked() {
                                    action_add_card = Some(deck.id.clone());
                                }
                                if ui.button("Edit").clicked() {
                                    action_edit = Some(DeckForm {
                                        deck_id: Some(deck.id.clone()),
                                        name: deck.name.clone(),
                                        description: deck.description.clone(),
                                    });
                                }
                                if ui.button("Delete").clicked() {
                                    action_delete = Some(deck.id.clone());
                                }
                            });
                        });
                    }
                });

            // Execute deferred actions
            if let Some(id) = action_learn {
                self.start_session(Some(id));
            }
            if action_edit.is_some() {
                self.edit_deck = action_edit;
            }
            if action_add_card.is_some() {
                self.add_card_deck = action_add_card;
            }
            if action_delete.is_some() {
                self.delete_deck = action_delete;
            }
        });
    }

    /// Renders the review screen with the current card and answer buttons
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_respond: Option<bool> = None;
        let mut action_flag = false;
        let mut action_save_notes = false;
        let mut action_restart = false;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.session else {
                action_back = true;
                return;
            };

            ui.horizontal(|ui| {
                if ui.button("⬅ Back to Home").clicked() {
                    action_back = true;
                }
                ui.heading(session.title());
                ui.label(format!("🔥 {}", self.store.stats().streak));
            });
            ui.separator();

            if session.is_complete() {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading("Review Complete!");
                    ui.label("Great job! You've completed your review session.");
                    ui.add_space(10.0);
                    ui.heading(format!("+{} XP", session.earned_xp()));
                    ui.label("Experience points earned this session");
                    ui.add_space(20.0);
                    ui.horizontal(|ui| {
                        if ui.button("View Stats").clicked() {
                            self.current_screen = AppScreen::Stats;
                        }
                        if ui.button("Review Again").clicked() {
                            action_restart = true;
                        }
                    });
                });
                return;
            }

            let (position, total) = session.progress();
            ui.label(format!("{} of {}", position + 1, total));
            ui.add(egui::ProgressBar::new(session.progress_percent() as f32 / 100.0));
            ui.add_space(10.0);

            let Some(card) = session.current_card(&self.store) else {
                return;
            };

            ui.horizontal(|ui| {
                let flag_label = if card.flagged { "🚩 Unflag" } else { "⚑ Flag" };
                if ui.button(flag_label).clicked() {
                    action_flag = true;
                }
                if ui.button("📝 Notes").clicked() {
                    self.show_notes = !self.show_notes;
                }
            });

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading("Question:");
                    ui.label(&card.question);
                    ui.add_space(20.0);
                    if self.show_answer {
                        ui.heading("Answer:");
                        ui.label(&card.answer);
                    } else {
                        ui.label("(Click 'Show Answer' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            if self.show_notes {
                ui.text_edit_multiline(&mut self.notes_draft);
                if ui.button("Save Notes").clicked() {
                    action_save_notes = true;
                }
            }

            ui.add_space(20.0);
            if !self.show_answer {
                if ui.button("Show Answer").clicked() {
                    self.show_answer = true;
                }
            } else {
                ui.horizontal(|ui| {
                    if ui.button("✖ Don't Know").clicked() {
                        action_respond = Some(false);
                    }
                    if ui.button("✔ Know").clicked() {
                        action_respond = Some(true);
                    }
                });
            }
        });

        // Execute deferred actions
        if action_save_notes {
            self.save_notes();
        }
        if action_flag {
            if let Some(session) = &self.session {
                if let Err(e) = session.flag_current(&mut self.store) {
                    tracing::error!(error = %e, "failed to flag card");
                }
            }
        }
        if let Some(knew) = action_respond {
            self.respond(knew);
        }
        if action_restart {
            if let Some(session) = &mut self.session {
                session.restart(&self.store, Utc::now());
            }
            self.load_current_card();
        }
        if action_back {
            self.session = None;
            self.current_screen = AppScreen::Main;
        }

        if let Some(milestone) = self.milestone.clone() {
            egui::Window::new("🎉 Streak Milestone!")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(milestone.message);
                    if ui.button("Continue").clicked() {
                        self.milestone = None;
                    }
                });
        }
    }

    /// Renders the stats screen: mastery, history and achievements
    fn render_stats_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("⬅ Back to Home").clicked() {
                self.current_screen = AppScreen::Main;
            }
            let stats = self.store.stats();
            let level = xp_level(stats.xp_points);

            ui.heading("Your Progress");
            egui::Grid::new("summary").striped(true).show(ui, |ui| {
                ui.label("Streak");
                ui.label(stats.streak.to_string());
                ui.end_row();
                ui.label("Total cards");
                ui.label(stats.total_cards.to_string());
                ui.end_row();
                ui.label("Mastered");
                ui.label(format!("{} ({}%)", stats.mastered_cards, mastery_percent(stats)));
                ui.end_row();
                ui.label("XP");
                ui.label(format!("{} (Level {})", stats.xp_points, level.level));
                ui.end_row();
            });

            ui.separator();
            ui.heading("Review History");
            if stats.review_history.is_empty() {
                ui.label("No review history available yet. Start reviewing cards to track your progress!");
            } else {
                egui::ScrollArea::vertical()
                    .id_source("history")
                    .max_height(150.0)
                    .show(ui, |ui| {
                        egui::Grid::new("history_grid").striped(true).show(ui, |ui| {
                            ui.strong("Date");
                            ui.strong("Correct");
                            ui.strong("Incorrect");
                            ui.end_row();
                            for day in stats.review_history.iter().rev() {
                                ui.label(&day.date);
                                ui.label(day.correct.to_string());
                                ui.label(day.incorrect.to_string());
                                ui.end_row();
                            }
                        });
                    });
            }

            ui.separator();
            ui.heading("Achievements");
            for achievement in achievements(stats) {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(achievement.icon);
                        ui.strong(achievement.name);
                        if achievement.unlocked {
                            ui.label("✔");
                        }
                    });
                    ui.label(achievement.description);
                    ui.add(
                        egui::ProgressBar::new(achievement.progress as f32 / 100.0)
                            .text(format!("{:.0}%", achievement.progress)),
                    );
                });
            }
        });
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(mut form) = self.edit_deck.take() {
            let mut keep_open = true;
            egui::Window::new("Edit Deck")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.text_edit_singleline(&mut form.name);
                    ui.text_edit_singleline(&mut form.description);
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            let id = form.deck_id.clone().unwrap_or_default();
                            match self.store.update_deck(&id, &form.name, &form.description) {
                                Ok(()) => keep_open = false,
                                Err(e) => self.show_message(e.to_string()),
                            }
                        }
                        if ui.button("Cancel").clicked() {
                            keep_open = false;
                        }
                    });
                });
            if keep_open {
                self.edit_deck = Some(form);
            }
        }

        if let Some(deck_id) = self.add_card_deck.clone() {
            egui::Window::new("Add Card")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Question:");
                        ui.text_edit_singleline(&mut self.current_question);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Answer:");
                        ui.text_edit_singleline(&mut self.current_answer);
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Add").clicked() {
                            match self.store.add_card(
                                &deck_id,
                                &self.current_question,
                                &self.current_answer,
                                Utc::now(),
                            ) {
                                Ok(_) => {
                                    self.current_question.clear();
                                    self.current_answer.clear();
                                    self.add_card_deck = None;
                                }
                                Err(e) => self.show_message(e.to_string()),
                            }
                        }
                        if ui.button("Cancel").clicked() {
                            self.add_card_deck = None;
                        }
                    });
                });
        }

        if let Some(deck_id) = self.delete_deck.clone() {
            egui::Window::new("Delete this deck and all its cards?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Delete").clicked() {
                            if let Err(e) = self.store.delete_deck(&deck_id) {
                                self.show_message(e.to_string());
                            }
                            self.delete_deck = None;
                        }
                        if ui.button("Cancel").clicked() {
                            self.delete_deck = None;
                        }
                    });
                });
        }

        // exporting a deck
        if self.show_export_dialog {
            let mut export_deck_id: Option<String> = None;
            let mut should_cancel = false;

            egui::Window::new("Export Deck")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Select a deck to export:");
                    ui.separator();
                    for deck in &self.store.decks().decks {
                        if ui
                            .button(format!("{} ({} cards)", deck.name, deck.cards.len()))
                            .clicked()
                        {
                            export_deck_id = Some(deck.id.clone());
                        }
                    }
                    ui.separator();
                    if ui.button("Cancel").clicked() {
                        should_cancel = true;
                    }
                });

            if let Some(id) = export_deck_id {
                self.handle_export(&id);
            }
            if should_cancel {
                self.show_export_dialog = false;
            }
        }

        if self.show_message_dialog {
            egui::Window::new("Flashcards")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_message_dialog = false;
                    }
                });
        }
    }

    /// Starts a review session for one deck or, with `None`, for all decks
    fn start_session(&mut self, deck_id: Option<String>) {
        match ReviewSession::start(&self.store, deck_id.as_deref(), Utc::now()) {
            Ok(session) => {
                self.session = Some(session);
                self.milestone = None;
                self.current_screen = AppScreen::Review;
                self.load_current_card();
            }
            Err(e) => {
                // Unknown deck: stay on the home screen
                tracing::warn!(error = %e, "could not start review session");
                self.current_screen = AppScreen::Main;
            }
        }
    }

    /// Resets per-card view state for the card now under review
    fn load_current_card(&mut self) {
        self.show_answer = false;
        self.show_notes = false;
        self.notes_draft = self
            .session
            .as_ref()
            .and_then(|s| s.current_card(&self.store))
            .map(|c| c.notes.clone())
            .unwrap_or_default();
    }

    fn save_notes(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let unchanged = session
            .current_card(&self.store)
            .is_some_and(|c| c.notes == self.notes_draft);
        if unchanged {
            return;
        }
        if let Err(e) = session.set_current_notes(&mut self.store, &self.notes_draft) {
            tracing::error!(error = %e, "failed to save notes");
        }
    }

    fn respond(&mut self, knew: bool) {
        self.save_notes();
        let Some(session) = &mut self.session else {
            return;
        };
        match session.respond(&mut self.store, knew, Utc::now()) {
            Ok(outcome) => {
                tracing::debug!(
                    xp = outcome.xp,
                    next_review = %format_review_time(outcome.next_review),
                    "answer recorded"
                );
                if outcome.milestone.is_some() {
                    self.milestone = outcome.milestone;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to record answer");
                self.show_message(format!("Could not save your answer: {e}"));
            }
        }
        self.load_current_card();
    }

    /// Handles deck export to JSON file
    fn handle_export(&mut self, deck_id: &str) {
        self.show_export_dialog = false;
        let Some(deck) = self.store.deck(deck_id).cloned() else {
            return;
        };
        // Open file save dialog
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", deck.name))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            let message = match export_json_to_path(&deck, &path) {
                Ok(()) => format!("Deck '{}' exported successfully!", deck.name),
                Err(e) => format!("Export failed: {e}"),
            };
            self.show_message(message);
        }
    }

    /// Handles deck import from JSON file
    fn handle_import(&mut self) {
        // Open file selection dialog
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            let message = match import_into(&mut self.store, &path) {
                Ok(id) => {
                    let count = self.store.deck(&id).map_or(0, |d| d.cards.len());
                    format!("Deck imported successfully with {count} cards!")
                }
                Err(e) => format!(
                    "Import failed: {e}\n\nPlease check if the file has correct structure:\n{{\n  \"name\": \"Deck Name\",\n  \"cards\": [...]\n}}"
                ),
            };
            self.show_message(message);
        }
    }
}
