//! Page sections and the page that bundles them
//!
//! Sections create their elements in the stage's scene, hand them to the
//! reveal choreographer, and (for the FAQ) own the accordion. Layout is the
//! host's job: it writes element boxes between [`LandingPage::mount`] and the
//! first frame.

use std::time::Duration;

use tracing::{debug, info};

use crate::capability::MotionProfile;
use crate::config::AppConfig;
use crate::content::{FaqEntry, SectionCopy};
use crate::disclosure::{DisclosureController, DisclosureItem, ItemElements, ToggleOutcome};
use crate::motion::AnimationHandle;
use crate::reveal::{MountHandle, RevealTargets};
use crate::scene::ElementId;
use crate::stage::Stage;
use crate::viewport::Viewport;

/// Window-control dots drawn on the corner of the FAQ and join cards
pub const WINDOW_CONTROLS: usize = 3;

#[derive(Debug)]
pub struct FaqSection {
    pub section: ElementId,
    pub container: ElementId,
    pub heading: ElementId,
    pub controls: Vec<ElementId>,
    accordion: DisclosureController,
    mount: MountHandle,
}

impl FaqSection {
    pub fn mount(stage: &mut Stage, entries: Vec<FaqEntry>) -> Self {
        let scene = &mut stage.scene;
        let section = scene.insert("faq.section");
        let container = scene.insert("faq.container");
        let heading = scene.insert("faq.heading");
        let controls: Vec<ElementId> = (0..WINDOW_CONTROLS)
            .map(|i| scene.insert(format!("faq.control[{}]", i)))
            .collect();

        let items: Vec<DisclosureItem> = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let elements = ItemElements {
                    card: scene.insert(format!("faq.card[{}]", i)),
                    label: scene.insert(format!("faq.label[{}]", i)),
                    icon: scene.insert(format!("faq.icon[{}]", i)),
                    content: scene.insert(format!("faq.content[{}]", i)),
                };
                DisclosureItem::new(entry, elements)
            })
            .collect();
        let cards = items.iter().map(|item| item.elements.card).collect();

        let accordion =
            DisclosureController::new(items, stage.motion().clone(), stage.profile());
        accordion.apply_closed_styles(&mut stage.scene, &mut stage.engine);

        let mount = stage.mount_reveal(
            RevealTargets::new(section, container)
                .with_heading(heading)
                .with_items(cards)
                .with_decorations(controls.clone()),
        );

        Self {
            section,
            container,
            heading,
            controls,
            accordion,
            mount,
        }
    }

    pub fn accordion(&self) -> &DisclosureController {
        &self.accordion
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount
    }

    /// Toggle card `index`; a card still playing its entrance is landed on
    /// its final state first
    pub fn toggle(&mut self, stage: &mut Stage, index: usize) -> ToggleOutcome {
        if self.accordion.is_torn_down() {
            return ToggleOutcome::Ignored;
        }
        if index < self.accordion.len() {
            stage.choreographer.settle_item(
                &mut stage.scene,
                &mut stage.engine,
                &mut stage.observer,
                self.mount,
                index,
            );
        }
        self.accordion.toggle(&mut stage.scene, &mut stage.engine, index)
    }

    fn on_frame(&mut self, stage: &mut Stage) {
        self.accordion.on_frame(&mut stage.scene, &mut stage.engine);
    }

    fn on_finished(&mut self, handle: AnimationHandle) {
        self.accordion.on_finished(handle);
    }

    fn teardown(&mut self, stage: &mut Stage) {
        self.accordion.teardown(&mut stage.engine);
        stage.teardown_reveal(self.mount);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    /// Hashtag call-out with window-control decorations
    Join,
    /// Sponsorship intro, container and heading only
    Partner,
}

/// A card that only plays an entrance
#[derive(Debug)]
pub struct RevealSection {
    pub kind: RevealKind,
    pub copy: SectionCopy,
    pub section: ElementId,
    pub container: ElementId,
    pub heading: ElementId,
    pub decorations: Vec<ElementId>,
    mount: MountHandle,
}

impl RevealSection {
    pub fn mount(stage: &mut Stage, kind: RevealKind, copy: SectionCopy) -> Self {
        let prefix = match kind {
            RevealKind::Join => "join",
            RevealKind::Partner => "partner",
        };
        let scene = &mut stage.scene;
        let section = scene.insert(format!("{}.section", prefix));
        let container = scene.insert(format!("{}.container", prefix));
        let heading = scene.insert(format!("{}.heading", prefix));
        let decorations: Vec<ElementId> = match kind {
            RevealKind::Join => (0..WINDOW_CONTROLS)
                .map(|i| scene.insert(format!("{}.control[{}]", prefix, i)))
                .collect(),
            RevealKind::Partner => Vec::new(),
        };

        let mount = stage.mount_reveal(
            RevealTargets::new(section, container)
                .with_heading(heading)
                .with_decorations(decorations.clone()),
        );

        Self {
            kind,
            copy,
            section,
            container,
            heading,
            decorations,
            mount,
        }
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount
    }
}

/// The whole landing page: one stage, the FAQ and two reveal cards
#[derive(Debug)]
pub struct LandingPage {
    pub stage: Stage,
    pub faq: FaqSection,
    pub join: RevealSection,
    pub partner: RevealSection,
    torn_down: bool,
}

impl LandingPage {
    pub fn mount(config: &AppConfig, profile: MotionProfile) -> Self {
        let mut stage = Stage::new(config.motion.clone(), profile);
        let faq = FaqSection::mount(&mut stage, config.event.faq.clone());
        let join = RevealSection::mount(
            &mut stage,
            RevealKind::Join,
            SectionCopy::join_the_conversation(&config.event.hashtag),
        );
        let partner = RevealSection::mount(
            &mut stage,
            RevealKind::Partner,
            SectionCopy::partner_with_us(&config.event.name),
        );
        info!(
            faq = faq.accordion().len(),
            elements = stage.scene.len(),
            ?profile,
            "landing page mounted"
        );
        Self {
            stage,
            faq,
            join,
            partner,
            torn_down: false,
        }
    }

    /// Run one frame: finish pending measurements, then drive the stage
    pub fn frame(&mut self, viewport: Viewport, now: Duration) {
        if self.torn_down {
            return;
        }
        // measured panels start their height tween at this frame's time
        self.stage.set_now(now);
        self.faq.on_frame(&mut self.stage);
        for handle in self.stage.frame(viewport, now) {
            self.faq.on_finished(handle);
        }
    }

    pub fn toggle(&mut self, index: usize) -> ToggleOutcome {
        if self.torn_down {
            debug!(index, "toggle after unmount ignored");
            return ToggleOutcome::Ignored;
        }
        self.faq.toggle(&mut self.stage, index)
    }

    /// Whether any tween is still running (idle floats count)
    pub fn is_animating(&self) -> bool {
        self.stage.engine.active_count() > 0
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Cancel every trigger and tween on the page; safe to repeat
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.faq.teardown(&mut self.stage);
        self.stage.teardown_reveal(self.join.mount);
        self.stage.teardown_reveal(self.partner.mount);
        self.torn_down = true;
        info!("landing page torn down");
    }
}
