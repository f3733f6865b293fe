//! Portfolio page
//!
//! One egui app for both the native window and the browser canvas. The
//! page owns the frame loop, the background field and the reveal
//! choreographer; sections report their geometry back each frame.

mod canvas;
mod content;
mod diagnostics;
mod header;
mod layout;
mod sections;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use eframe::egui;
use tracing::{debug, info, warn};

use crate::core::{
    CardHover, Choreographer, Ease, FieldSimulator, FrameLoop, KeyValueStore, Language, LanguageStore,
    MemoryStore, PageConfig, ParticleField, RevealConfig, RevealScope, RevealStyle, ScrollState,
    Subscription, TargetId, Threshold, TriggerBounds, TriggerId, LANGUAGE_KEY,
};
use crate::theme::{colors, light_visuals};
use crate::time::FrameClock;

#[cfg(target_arch = "wasm32")]
use crate::store_wasm::{browser_locale, LocalStore, StorageListener};
#[cfg(not(target_arch = "wasm32"))]
use crate::store_native::{system_locale, FileStore};

use canvas::EguiSurface;
use content::{Category, Project, Skill, PROJECTS};

const PROJECTS_TITLE: &str = "projects-title";
const PROJECTS_GRID: &str = "projects-grid";
const SKILLS_TITLE: &str = "skills-title";
const SKILLS_GRID: &str = "skills-grid";

/// Seconds between re-reads of the preference file (native)
#[cfg(not(target_arch = "wasm32"))]
const PREFS_POLL_SECS: f64 = 2.0;

/// Navigation anchors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Home,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Home, Section::Projects, Section::Skills, Section::Contact];

    pub fn label(self) -> content::Text {
        match self {
            Section::Home => content::nav::HOME,
            Section::Projects => content::nav::PROJECTS,
            Section::Skills => content::nav::SKILLS,
            Section::Contact => content::nav::CONTACT,
        }
    }
}

fn project_target(project: &Project) -> TargetId {
    TargetId::new(format!("project:{}", project.key))
}

fn skill_target(skill: &Skill) -> TargetId {
    TargetId::new(format!("skill:{}", skill.name))
}

fn fade_up(distance: f32) -> RevealStyle {
    RevealStyle::VISIBLE.opacity(0.0).offset(0.0, distance)
}

#[cfg(target_arch = "wasm32")]
fn open_preferences() -> (LanguageStore<Box<dyn KeyValueStore>>, Option<StorageListener>) {
    let backend: Box<dyn KeyValueStore> = match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "localStorage unavailable, language kept for this session only");
            Box::new(MemoryStore::new())
        }
    };
    let listener = StorageListener::attach(LANGUAGE_KEY)
        .map_err(|e| warn!(error = %e, "Cross-tab language sync disabled"))
        .ok();
    (LanguageStore::new(backend, browser_locale()), listener)
}

#[cfg(not(target_arch = "wasm32"))]
fn open_preferences() -> LanguageStore<Box<dyn KeyValueStore>> {
    let backend: Box<dyn KeyValueStore> = match FileStore::from_env() {
        Ok(store) => {
            info!(path = %store.path().display(), key = LANGUAGE_KEY, "Preference file resolved");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Preference file unavailable, language kept for this session only");
            Box::new(MemoryStore::new())
        }
    };
    LanguageStore::new(backend, system_locale())
}

/// Mirror the language on `<html lang>`
#[cfg(target_arch = "wasm32")]
fn set_document_language(language: Language) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        if let Err(e) = root.set_attribute("lang", language.as_str()) {
            warn!(?e, "Failed to set document language");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn set_document_language(_language: Language) {}

pub struct PortfolioApp {
    pub(crate) config: PageConfig,

    language: LanguageStore<Box<dyn KeyValueStore>>,
    /// Language the page renders in, kept current by the store subscription
    current_language: Rc<Cell<Language>>,
    _language_subscription: Subscription,
    #[cfg(target_arch = "wasm32")]
    storage_listener: Option<StorageListener>,
    #[cfg(not(target_arch = "wasm32"))]
    last_prefs_poll: f64,

    frames: FrameLoop,
    pub(crate) field: FieldSimulator,
    canvas: EguiSurface,

    pub(crate) reveals: Choreographer,
    projects_scope: RevealScope,
    skills_scope: RevealScope,
    /// Trigger geometry in document coordinates, refreshed every frame
    layout: HashMap<TriggerId, TriggerBounds>,
    /// Screen y of the document top this frame
    doc_origin: f32,
    last_viewport_width: Option<f32>,

    clock: FrameClock,
    pub(crate) fps_counter: header::FpsCounter,
    /// Pointer hover state per project card
    hovers: HashMap<&'static str, CardHover>,
    pub(crate) category: Category,
    pub(crate) scroll_target: Option<Section>,
    pub(crate) show_diagnostics: bool,
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: PageConfig) -> Self {
        cc.egui_ctx.set_visuals(light_visuals());

        #[cfg(target_arch = "wasm32")]
        let (language, storage_listener) = open_preferences();
        #[cfg(not(target_arch = "wasm32"))]
        let language = open_preferences();

        let current_language = Rc::new(Cell::new(language.current()));
        set_document_language(current_language.get());
        let cell = current_language.clone();
        let subscription = language.subscribe(move |lang| {
            cell.set(lang);
            set_document_language(lang);
        });

        let field = FieldSimulator::new(ParticleField::from_entropy(config.field.clone()));
        let show_diagnostics = config.diagnostics;

        let mut app = Self {
            config,
            language,
            current_language,
            _language_subscription: subscription,
            #[cfg(target_arch = "wasm32")]
            storage_listener,
            #[cfg(not(target_arch = "wasm32"))]
            last_prefs_poll: 0.0,
            frames: FrameLoop::new(),
            field,
            canvas: EguiSurface::default(),
            reveals: Choreographer::new(),
            projects_scope: RevealScope::new(),
            skills_scope: RevealScope::new(),
            layout: HashMap::new(),
            doc_origin: 0.0,
            last_viewport_width: None,
            clock: FrameClock::new(),
            fps_counter: header::FpsCounter::new(),
            hovers: HashMap::new(),
            category: Category::All,
            scroll_target: None,
            show_diagnostics,
        };
        app.register_project_reveals();
        app.register_skill_reveals();

        info!(language = %app.language(), reveals = app.reveals.len(), "Page ready");
        app
    }

    pub(crate) fn language(&self) -> Language {
        self.current_language.get()
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        if language == self.language() {
            return;
        }
        if let Err(e) = self.language.set(language) {
            warn!(error = %e, "Saving language preference failed");
            self.current_language.set(language);
            set_document_language(language);
        }
    }

    /// Pick up a language written by another tab
    #[cfg(target_arch = "wasm32")]
    fn poll_language(&mut self, _now: f64) {
        if self.storage_listener.as_ref().is_some_and(|l| l.take()) {
            self.language.sync();
        }
    }

    /// Pick up a language written by another running instance
    #[cfg(not(target_arch = "wasm32"))]
    fn poll_language(&mut self, now: f64) {
        if now - self.last_prefs_poll >= PREFS_POLL_SECS {
            self.last_prefs_poll = now;
            self.language.sync();
        }
    }

    fn register_project_reveals(&mut self) {
        self.projects_scope.revert();

        let title = RevealConfig::new(Threshold::new(0.0, 0.85), fade_up(40.0))
            .duration(0.8)
            .ease(Ease::PowerOut(3))
            .reversible(true);
        self.projects_scope
            .add(self.reveals.register(PROJECTS_TITLE, [TargetId::from(PROJECTS_TITLE)], title));

        let cards = RevealConfig::new(Threshold::new(0.0, 0.8), fade_up(60.0).rotate(15.0, 0.0))
            .duration(0.8)
            .stagger(0.15)
            .ease(Ease::PowerOut(3))
            .reversible(true);
        self.projects_scope
            .add(self.reveals.register(PROJECTS_GRID, PROJECTS.iter().map(project_target), cards));
    }

    /// (Re)register the skills reveals for the visible cards. Runs on
    /// mount and on every filter change.
    fn register_skill_reveals(&mut self) {
        self.skills_scope.revert();

        let title = RevealConfig::new(Threshold::new(0.0, 0.85), fade_up(40.0))
            .duration(0.8)
            .ease(Ease::PowerOut(3));
        self.skills_scope
            .add(self.reveals.register(SKILLS_TITLE, [TargetId::from(SKILLS_TITLE)], title));

        let cards = RevealConfig::new(
            Threshold::new(0.0, 0.8),
            RevealStyle::VISIBLE.opacity(0.0).scale(0.8),
        )
        .duration(0.5)
        .stagger(0.05)
        .ease(Ease::BackOut(1.7));
        let targets = content::filtered(self.category).map(skill_target);
        self.skills_scope
            .add(self.reveals.register(SKILLS_GRID, targets, cards));

        self.reveals.request_refresh();
    }

    pub(crate) fn set_category(&mut self, category: Category) {
        if category == self.category {
            return;
        }
        debug!(?category, "Skill filter changed");
        self.category = category;
        // The new registrations are measured at the end of this frame,
        // which is then redrawn with the cards hidden
        self.register_skill_reveals();

        // Fresh scatter for the resized section
        self.field.stop();
    }

    pub(crate) fn record_trigger(&mut self, id: &str, rect: egui::Rect) {
        self.layout.insert(
            TriggerId::from(id),
            TriggerBounds {
                top: rect.top() - self.doc_origin,
                height: rect.height(),
            },
        );
    }

    /// Scroll `rect` to the top of the viewport if `section` was requested
    pub(crate) fn scroll_if_targeted(&mut self, ui: &egui::Ui, section: Section, rect: egui::Rect) {
        if self.scroll_target == Some(section) {
            ui.scroll_to_rect(rect, Some(egui::Align::TOP));
            self.scroll_target = None;
        }
    }

    /// Attach the canvas to the section rect, run one frame of the loop and
    /// paint the field into the reserved slot
    fn paint_field(&mut self, ui: &egui::Ui, section: egui::Rect, slot: egui::layers::ShapeIdx, now: f64) {
        let visible = ui.is_rect_visible(section);
        self.canvas.attach(visible.then_some(section));

        // A running field rebuilds itself when the canvas extent changes
        if !self.field.is_running() {
            self.field.start(&mut self.frames, &self.canvas);
        }

        self.frames.tick(&mut self.canvas, now);

        let shapes = self.canvas.take_shapes();
        ui.painter()
            .with_clip_rect(section.intersect(ui.clip_rect()))
            .set(slot, egui::Shape::Vec(shapes));
    }

    fn render_page(&mut self, ui: &mut egui::Ui, now: f64) {
        self.doc_origin = ui.cursor().top();
        ui.spacing_mut().item_spacing.y = 0.0;

        let hero = self.render_hero(ui);
        self.scroll_if_targeted(ui, Section::Home, hero);

        let projects = self.render_projects(ui, now);
        self.scroll_if_targeted(ui, Section::Projects, projects);

        let (skills, field_slot) = self.render_skills(ui);
        self.paint_field(ui, skills, field_slot, now);
        self.scroll_if_targeted(ui, Section::Skills, skills);

        let contact = self.render_contact(ui);
        self.scroll_if_targeted(ui, Section::Contact, contact);

        self.render_footer(ui);
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The field animates continuously
        ctx.request_repaint();

        let (now, dt) = self.clock.tick();
        self.fps_counter.tick(now);
        self.poll_language(now);

        // Height changes are picked up by the choreographer itself; a width
        // change reflows the grids and moves every trigger
        let width = ctx.screen_rect().width();
        if self.last_viewport_width != Some(width) {
            if self.last_viewport_width.is_some() {
                debug!(width, "Viewport width changed");
                self.reveals.request_refresh();
            }
            self.last_viewport_width = Some(width);
        }

        self.render_nav(ctx);

        let output = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PAGE))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| self.render_page(ui, now))
            })
            .inner;

        let scroll = ScrollState {
            top: output.state.offset.y,
            viewport_height: output.inner_rect.height(),
        };
        let first_measured = self.reveals.update(&self.layout, scroll, dt);
        if first_measured > 0 {
            // Targets just got their start styles; repaint before showing
            // them in the natural state
            ctx.request_discard("reveal targets measured");
        }

        if self.show_diagnostics {
            self.draw_diagnostics(ctx);
        }
    }
}
