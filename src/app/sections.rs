//! Page sections, top to bottom

use eframe::egui::{self, Align, Layout, Rect, RichText, Sense, Ui, UiBuilder};

use crate::core::{Language, RevealStyle, TargetId};
use crate::theme::colors;

use super::content::{self, Text};
use super::layout::{columns_for, grid_height, grid_slots, revealed, section, transformed_rect};
use super::{
    project_target, skill_target, PortfolioApp, Section, PROJECTS_GRID, PROJECTS_TITLE,
    SKILLS_GRID, SKILLS_TITLE,
};

const PROJECT_CARD_MIN_WIDTH: f32 = 300.0;
const PROJECT_CARD_HEIGHT: f32 = 300.0;
const SKILL_CARD_MIN_WIDTH: f32 = 180.0;
const SKILL_CARD_HEIGHT: f32 = 118.0;
const CARD_PADDING: f32 = 16.0;
const TAG_FONT: f32 = 13.0;
const TAG_PADDING: f32 = 8.0;

fn badge(ui: &mut Ui, text: &str) {
    egui::Frame::new()
        .fill(colors::BG_CHIP)
        .corner_radius(16.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(colors::ACCENT).size(13.0));
        });
}

/// Badge, heading and subtitle of a section
fn title_block(ui: &mut Ui, language: Language, badge_text: Text, title: Text, subtitle: Text) {
    badge(ui, badge_text.get(language));
    ui.add_space(16.0);
    ui.label(
        RichText::new(title.get(language))
            .size(44.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(16.0);
    ui.label(
        RichText::new(subtitle.get(language))
            .size(17.0)
            .color(colors::TEXT_SECONDARY),
    );
    ui.add_space(48.0);
}

/// Child ui confined to a (possibly transformed) card rect
fn card_ui(ui: &mut Ui, rect: Rect, opacity: f32) -> Option<Ui> {
    if rect.width() < 1.0 || rect.height() < 1.0 || opacity <= 0.0 {
        return None;
    }
    let mut child = ui.new_child(
        UiBuilder::new()
            .max_rect(rect)
            .layout(Layout::top_down(Align::Min)),
    );
    child.set_clip_rect(rect.intersect(ui.clip_rect()));
    child.multiply_opacity(opacity);
    Some(child)
}

fn card_frame(ui: &mut Ui, rect: Rect, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(colors::BG_SECTION)
        .stroke(egui::Stroke::new(2.0, colors::BORDER))
        .corner_radius(12.0)
        .inner_margin(CARD_PADDING)
        .show(ui, |ui| {
            let inner = rect.size() - egui::Vec2::splat(2.0 * (CARD_PADDING + 2.0));
            ui.set_min_size(inner.max(egui::Vec2::ZERO));
            ui.set_max_width(inner.x.max(0.0));
            add_contents(ui);
        });
}

fn level_bar(ui: &mut Ui, level: u8) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 8.0), Sense::hover());
    ui.painter().rect_filled(rect, 4.0, colors::BORDER);
    let filled = Rect::from_min_size(
        rect.min,
        egui::vec2(rect.width() * f32::from(level.min(100)) / 100.0, rect.height()),
    );
    ui.painter().rect_filled(filled, 4.0, colors::ACCENT);
}

/// Tag chip drawn at its layout slot under `style`
fn tag_chip(ui: &mut Ui, text: &str, style: RevealStyle) {
    let natural = ui
        .painter()
        .layout_no_wrap(text.to_owned(), egui::FontId::proportional(TAG_FONT), colors::ACCENT);
    let (slot, _) = ui.allocate_exact_size(natural.size() + egui::Vec2::splat(2.0 * TAG_PADDING), Sense::hover());
    if style.opacity <= 0.0 || !ui.is_rect_visible(slot) {
        return;
    }
    let rect = transformed_rect(slot, &style);
    let painter = ui.painter();
    painter.rect_filled(rect, rect.height() / 2.0, colors::BG_CHIP.gamma_multiply(style.opacity));
    let galley = painter.layout_no_wrap(
        text.to_owned(),
        egui::FontId::proportional(TAG_FONT * style.scale),
        colors::ACCENT.gamma_multiply(style.opacity),
    );
    painter.galley(rect.center() - galley.size() / 2.0, galley, colors::ACCENT);
}

fn project_card(
    ui: &mut Ui,
    language: Language,
    project: &content::Project,
    tag_style: impl Fn(usize) -> RevealStyle,
) {
    ui.label(
        RichText::new(project.title.get(language))
            .size(19.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(10.0);
    ui.label(
        RichText::new(project.description.get(language))
            .size(14.0)
            .color(colors::TEXT_SECONDARY),
    );
    ui.add_space(14.0);
    ui.horizontal_wrapped(|ui| {
        for (index, tag) in project.tags.iter().enumerate() {
            tag_chip(ui, tag, tag_style(index));
        }
    });
    ui.add_space(14.0);
    let code = content::projects::CODE.get(language);
    match project.github {
        Some(url) => {
            ui.hyperlink_to(RichText::new(code).color(colors::ACCENT), url);
        }
        None => {
            ui.label(RichText::new(code).color(colors::TEXT_MUTED));
        }
    }
}

fn skill_card(ui: &mut Ui, skill: &content::Skill) {
    ui.label(RichText::new(skill.name).strong().color(colors::TEXT_PRIMARY));
    ui.add_space(12.0);
    level_bar(ui, skill.level);
    ui.add_space(4.0);
    ui.label(
        RichText::new(format!("{}%", skill.level))
            .size(12.0)
            .color(colors::TEXT_SECONDARY),
    );
}

impl PortfolioApp {
    fn style_of(&self, target: &TargetId) -> RevealStyle {
        self.reveals.style(target).unwrap_or(RevealStyle::VISIBLE)
    }

    pub(crate) fn render_hero(&mut self, ui: &mut Ui) -> Rect {
        let language = self.language();
        let (rect, clicked) = section(ui, colors::BG_PAGE, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(64.0);
                ui.label(
                    RichText::new(content::OWNER)
                        .size(56.0)
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                ui.add_space(12.0);
                ui.label(
                    RichText::new(content::hero::ROLE.get(language))
                        .size(22.0)
                        .color(colors::ACCENT),
                );
                ui.add_space(20.0);
                ui.label(
                    RichText::new(content::hero::BLURB.get(language))
                        .size(17.0)
                        .color(colors::TEXT_SECONDARY),
                );
                ui.add_space(32.0);
                let cta = egui::Button::new(
                    RichText::new(content::hero::CTA.get(language)).color(egui::Color32::WHITE),
                )
                .fill(colors::ACCENT);
                let clicked = ui.add(cta).clicked();
                ui.add_space(64.0);
                clicked
            })
            .inner
        });
        if clicked {
            self.scroll_target = Some(Section::Projects);
        }
        rect
    }

    pub(crate) fn render_projects(&mut self, ui: &mut Ui, now: f64) -> Rect {
        let language = self.language();
        let title_style = self.reveals.style(&TargetId::from(PROJECTS_TITLE));
        let reveals = &self.reveals;
        let hovers = &mut self.hovers;

        let (rect, (title_rect, grid_rect)) = section(ui, colors::BG_PAGE, |ui| {
            let (title_rect, ()) = revealed(ui, title_style, |ui| {
                title_block(
                    ui,
                    language,
                    content::projects::BADGE,
                    content::projects::TITLE,
                    content::projects::SUBTITLE,
                )
            });

            let width = ui.available_width();
            let count = content::PROJECTS.len();
            let columns = columns_for(width, PROJECT_CARD_MIN_WIDTH, 3);
            let (grid_rect, _) = ui.allocate_exact_size(
                egui::vec2(width, grid_height(count, columns, PROJECT_CARD_HEIGHT)),
                Sense::hover(),
            );
            let slots = grid_slots(grid_rect, count, columns, PROJECT_CARD_HEIGHT);
            let pointer = ui.ctx().pointer_hover_pos().filter(|p| ui.clip_rect().contains(*p));
            for (project, slot) in content::PROJECTS.iter().zip(slots) {
                // Hit-test the untransformed slot so the tilt cannot move
                // the card out from under the pointer
                let local = pointer
                    .filter(|p| slot.contains(*p))
                    .map(|p| glam::Vec2::new(p.x - slot.min.x, p.y - slot.min.y));
                let hover = hovers.entry(project.key).or_default();
                hover.pointer(local, glam::Vec2::new(slot.width(), slot.height()), now);
                let hover = *hover;

                let tilt = hover.tilt(now);
                let style = reveals
                    .style(&project_target(project))
                    .unwrap_or(RevealStyle::VISIBLE);
                let style = style.rotate(style.rotate_x + tilt.x, style.rotate_y + tilt.y);
                let rect = transformed_rect(slot, &style);
                if let Some(mut card) = card_ui(ui, rect, style.opacity) {
                    card_frame(&mut card, rect, |ui| {
                        project_card(ui, language, project, |i| hover.tag_style(i, now))
                    });
                }
            }
            hovers.retain(|_, hover| !hover.is_idle(now));
            (title_rect, grid_rect)
        });

        self.record_trigger(PROJECTS_TITLE, title_rect);
        self.record_trigger(PROJECTS_GRID, grid_rect);
        rect
    }

    /// Returns the section rect and the paint slot reserved for the field
    pub(crate) fn render_skills(&mut self, ui: &mut Ui) -> (Rect, egui::layers::ShapeIdx) {
        let language = self.language();
        let title_style = self.reveals.style(&TargetId::from(SKILLS_TITLE));

        let (rect, (slot, title_rect, grid_rect, picked)) = section(ui, colors::BG_SECTION, |ui| {
            // Field sits above the background, below the content
            let slot = ui.painter().add(egui::Shape::Noop);

            let (title_rect, ()) = revealed(ui, title_style, |ui| {
                title_block(
                    ui,
                    language,
                    content::skills::BADGE,
                    content::skills::TITLE,
                    content::skills::SUBTITLE,
                )
            });

            let mut picked = None;
            ui.horizontal_wrapped(|ui| {
                for category in content::categories() {
                    let selected = self.category == category;
                    let text = RichText::new(category.label(language)).size(14.0);
                    if ui.selectable_label(selected, text).clicked() && !selected {
                        picked = Some(category);
                    }
                }
            });
            ui.add_space(40.0);

            let skills: Vec<&content::Skill> = content::filtered(self.category).collect();
            let width = ui.available_width();
            let columns = columns_for(width, SKILL_CARD_MIN_WIDTH, 5);
            let (grid_rect, _) = ui.allocate_exact_size(
                egui::vec2(width, grid_height(skills.len(), columns, SKILL_CARD_HEIGHT)),
                Sense::hover(),
            );
            let slots = grid_slots(grid_rect, skills.len(), columns, SKILL_CARD_HEIGHT);
            for (skill, slot) in skills.iter().zip(slots) {
                let style = self.style_of(&skill_target(skill));
                let rect = transformed_rect(slot, &style);
                if let Some(mut card) = card_ui(ui, rect, style.opacity) {
                    card_frame(&mut card, rect, |ui| skill_card(ui, skill));
                }
            }
            (slot, title_rect, grid_rect, picked)
        });

        self.record_trigger(SKILLS_TITLE, title_rect);
        self.record_trigger(SKILLS_GRID, grid_rect);
        if let Some(category) = picked {
            self.set_category(category);
        }
        (rect, slot)
    }

    pub(crate) fn render_contact(&mut self, ui: &mut Ui) -> Rect {
        let language = self.language();
        let (rect, ()) = section(ui, colors::BG_SECTION, |ui| {
            ui.vertical_centered(|ui| {
                title_block(
                    ui,
                    language,
                    content::contact::BADGE,
                    content::contact::TITLE,
                    content::contact::BODY,
                );
                ui.horizontal(|ui| {
                    ui.hyperlink_to(RichText::new("GitHub").size(16.0), content::GITHUB_URL);
                    ui.add_space(24.0);
                    ui.hyperlink_to(RichText::new("LinkedIn").size(16.0), content::LINKEDIN_URL);
                });
            });
        });
        rect
    }

    fn footer_heading(ui: &mut Ui, text: &str) {
        ui.label(RichText::new(text).strong().color(egui::Color32::WHITE));
        ui.add_space(12.0);
    }

    fn footer_link(ui: &mut Ui, text: &str) -> bool {
        ui.add(
            egui::Label::new(RichText::new(text).size(14.0).color(colors::TEXT_ON_DARK))
                .sense(Sense::click()),
        )
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
    }

    pub(crate) fn render_footer(&mut self, ui: &mut Ui) -> Rect {
        let language = self.language();
        let mut jump = None;
        let mut chosen_language = None;

        let (rect, ()) = section(ui, colors::BG_FOOTER, |ui| {
            ui.horizontal_top(|ui| {
                let column = (ui.available_width() / 4.0).max(160.0);

                ui.allocate_ui(egui::vec2(column, 0.0), |ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(content::OWNER)
                                .size(18.0)
                                .strong()
                                .color(egui::Color32::WHITE),
                        );
                        ui.add_space(12.0);
                        ui.label(
                            RichText::new(content::hero::BLURB.get(language))
                                .size(14.0)
                                .color(colors::TEXT_ON_DARK),
                        );
                        ui.add_space(16.0);
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format!("{}:", content::footer::LANGUAGE.get(language)))
                                    .size(12.0)
                                    .color(colors::TEXT_ON_DARK),
                            );
                            for (lang, label) in [(Language::It, "IT"), (Language::En, "EN")] {
                                if ui.selectable_label(language == lang, label).clicked() {
                                    chosen_language = Some(lang);
                                }
                            }
                        });
                        ui.add_space(16.0);
                        if Self::footer_link(ui, &format!("\u{2191} {}", content::footer::BACK_TO_TOP.get(language))) {
                            jump = Some(Section::Home);
                        }
                    });
                });

                ui.allocate_ui(egui::vec2(column, 0.0), |ui| {
                    ui.vertical(|ui| {
                        Self::footer_heading(ui, content::footer::NAVIGATION.get(language));
                        for anchor in Section::ALL {
                            if Self::footer_link(ui, anchor.label().get(language)) {
                                jump = Some(anchor);
                            }
                        }
                    });
                });

                ui.allocate_ui(egui::vec2(column, 0.0), |ui| {
                    ui.vertical(|ui| {
                        Self::footer_heading(ui, content::footer::FOCUS.get(language));
                        for item in content::footer::FOCUS_ITEMS {
                            if Self::footer_link(ui, item.get(language)) {
                                jump = Some(Section::Projects);
                            }
                        }
                    });
                });

                ui.allocate_ui(egui::vec2(column, 0.0), |ui| {
                    ui.vertical(|ui| {
                        Self::footer_heading(ui, content::footer::NETWORKS.get(language));
                        ui.hyperlink_to(
                            RichText::new("GitHub").color(colors::TEXT_ON_DARK),
                            content::GITHUB_URL,
                        );
                        ui.hyperlink_to(
                            RichText::new("LinkedIn").color(colors::TEXT_ON_DARK),
                            content::LINKEDIN_URL,
                        );
                    });
                });
            });

            ui.add_space(40.0);
            ui.separator();
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!(
                        "Copyright {}. {}",
                        content::OWNER,
                        content::footer::RIGHTS.get(language)
                    ))
                    .size(13.0)
                    .color(colors::TEXT_ON_DARK),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new(content::footer::MADE_IN.get(language))
                            .size(13.0)
                            .color(colors::TEXT_ON_DARK),
                    );
                });
            });
        });

        if let Some(lang) = chosen_language {
            self.set_language(lang);
        }
        if let Some(anchor) = jump {
            self.scroll_target = Some(anchor);
        }
        rect
    }
}
