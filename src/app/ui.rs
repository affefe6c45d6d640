use super::ActionProgress;
use super::InvoiceUploader;
use crate::report::{Block, Report};
use crate::upload::{selection_label, UploadStatus};
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl InvoiceUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        self.render_alert(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Invoice Uploader");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Send PDF invoices and read back the extracted data")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        let idle = !self.state.is_uploading;
                        ui.add_enabled_ui(idle, |ui| {
                            if ui.button("📄 Select PDFs").clicked() {
                                let extensions = self.config.picker.extensions.as_slice();
                                if let Some(paths) = FileDialog::new()
                                    .add_filter("Invoices", extensions)
                                    .pick_files()
                                {
                                    self.select_files(paths);
                                }
                            }
                            if ui.button("📁 Select Folder").clicked() {
                                if let Some(folder) = FileDialog::new().pick_folder() {
                                    self.select_folder(&folder);
                                }
                            }
                        });
                    });
                    ui.add_space(4.0);
                    ui.label(selection_label(&self.state.selected_files));
                });

                ui.add_space(20.0);

                ui.vertical_centered(|ui| {
                    ui.add_enabled_ui(!self.state.is_uploading, |ui| {
                        let button = egui::Button::new("📤 Send invoices")
                            .min_size(egui::vec2(200.0, 40.0));
                        if ui.add(button).clicked() {
                            self.start_upload();
                        }
                    });

                    if matches!(self.state.progress, ActionProgress::Completed { .. }) {
                        ui.add_space(5.0);
                        ui.horizontal(|ui| {
                            if ui.button("📋 Copy results").clicked() {
                                if let Some(text) = self.results_text() {
                                    ui.output_mut(|o| o.copied_text = text);
                                }
                            }
                            if ui.button("🗑 Clear").clicked() {
                                self.reset_upload_state();
                            }
                        });
                    }
                });

                ui.add_space(20.0);
                self.render_output(ui);

                if let Some(error) = &self.state.error_message {
                    ui.add_space(10.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(FAILURE, error);
                    });
                }
                ui.add_space(20.0);
            });
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.alert.clone() else {
            return;
        };

        egui::Window::new("Attention")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.state.alert = None;
                    }
                });
            });
    }

    fn render_output(&mut self, ui: &mut egui::Ui) {
        if matches!(self.state.progress, ActionProgress::NotStarted) {
            return;
        }

        ui.group(|ui| {
            if self.state.is_uploading {
                ui.label("⏳ Processing invoices...");
            }

            let progress_bar = egui::ProgressBar::new(self.state.get_progress_percentage())
                .show_percentage()
                .animate(self.state.is_uploading)
                .fill(ACCENT);
            ui.add(progress_bar);
            ui.label(self.state.get_status_text());

            if let Some(report) = &self.state.report {
                ui.add_space(10.0);
                render_report(ui, report);
            }
        });

        if !self.state.file_statuses.is_empty() {
            ui.add_space(10.0);
            self.render_details(ui);
        }
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.state.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.state.show_details = !self.state.show_details;
        }

        if !self.state.show_details {
            return;
        }

        egui::ScrollArea::vertical()
            .id_source("file_statuses")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        for status in &self.state.file_statuses {
                            ui.horizontal(|ui| match &status.status {
                                UploadStatus::Processing => {
                                    ui.label("⏳");
                                    ui.colored_label(MUTED, format!("{} - Sending...", status.name));
                                }
                                UploadStatus::Success => {
                                    ui.label("✅");
                                    ui.colored_label(SUCCESS, &status.name);
                                }
                                UploadStatus::Error(err) => {
                                    ui.label("❌");
                                    ui.colored_label(FAILURE, err);
                                }
                            });
                            ui.add_space(4.0);
                        }
                        ui.add_space(8.0);
                    });
            });
    }
}

fn render_report(ui: &mut egui::Ui, report: &Report) {
    for block in report.blocks() {
        match block {
            Block::FileHeader(name) => {
                ui.label(RichText::new(format!("File: {name}")).heading());
            }
            Block::SectionTitle(title) => {
                ui.label(RichText::new(*title).strong().color(ACCENT));
            }
            Block::Field {
                label,
                value,
                present,
            } => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{label}:")).strong());
                    if *present {
                        ui.label(value);
                    } else {
                        ui.colored_label(MUTED, value);
                    }
                });
            }
            Block::Notice(text) => {
                ui.colored_label(FAILURE, *text);
            }
            Block::Failure { file_name, message } => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{file_name}:")).strong());
                    ui.colored_label(FAILURE, message);
                });
            }
            Block::Separator => {
                ui.separator();
            }
        }
    }
}
