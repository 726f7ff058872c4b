//! Scene simulation
//!
//! Mounts every widget of a scene on a virtual host and steps the clock,
//! printing each widget's derived value at a fixed sample interval.

use crate::config::{Scene, ScriptAction, ScriptStep, WidgetKind};
use anyhow::{Context, Result};
use kinetic_animation::{
    Counter, FadeInView, GlowStyle, Morphing, Parallax, Presentation, ScrollProgress,
    StaggeredList, Typewriter,
};
use kinetic_core::{HostHandle, HostScheduler, RegionId};
use kinetic_i18n::{LocaleChanged, Localizer, Subscription};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, info};

/// Clock stepping for a run
#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub step_ms: u32,
    pub duration_ms: u32,
    pub sample_ms: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            step_ms: 16,
            duration_ms: 4000,
            sample_ms: 250,
        }
    }
}

enum Widget {
    Counter(Counter),
    Typewriter {
        view: Typewriter,
        key: Option<String>,
    },
    FadeIn(FadeInView),
    Parallax(Parallax),
    Morph(Morphing<String>),
    Stagger(StaggeredList),
    ScrollProgress(ScrollProgress),
    Glow(GlowStyle),
}

impl Widget {
    fn sample(&self, localizer: &Localizer) -> String {
        match self {
            Widget::Counter(counter) => counter.display(localizer.locale()),
            Widget::Typewriter { view, .. } => format!("{:?}", view.render()),
            Widget::FadeIn(view) => format_presentation(&view.presentation()),
            Widget::Parallax(layer) => format!("{:+.1}px", layer.offset()),
            Widget::Morph(morph) => morph.active().clone(),
            Widget::Stagger(list) => list
                .flags()
                .iter()
                .map(|&shown| if shown { '#' } else { '.' })
                .collect(),
            Widget::ScrollProgress(progress) => format!("{}%", progress.percent()),
            Widget::Glow(glow) => glow.box_shadow(),
        }
    }
}

fn format_presentation(presentation: &Presentation) -> String {
    format!(
        "{:.2}@{:+.1},{:+.1}",
        presentation.opacity, presentation.translate_x, presentation.translate_y
    )
}

fn mount_widget(
    host: &HostHandle,
    kind: &WidgetKind,
    region: Option<RegionId>,
    localizer: &Localizer,
) -> kinetic_animation::Result<Widget> {
    let widget = match kind {
        WidgetKind::Counter { config, .. } => {
            Widget::Counter(Counter::mount(host, region, config.clone())?)
        }
        WidgetKind::Typewriter { key, config } => {
            let mut config = config.clone();
            if let Some(key) = key {
                config.text = localizer.translate(key);
            }
            Widget::Typewriter {
                view: Typewriter::mount(host, config),
                key: key.clone(),
            }
        }
        WidgetKind::FadeIn { config, .. } => {
            Widget::FadeIn(FadeInView::mount(host, region, config.clone())?)
        }
        WidgetKind::Parallax { config } => Widget::Parallax(Parallax::mount(host, *config)?),
        WidgetKind::Morph { items, config } => {
            Widget::Morph(Morphing::mount(host, items.clone(), *config)?)
        }
        WidgetKind::Stagger { items, config, .. } => Widget::Stagger(StaggeredList::mount(
            host,
            region,
            *items,
            config.clone(),
        )?),
        WidgetKind::ScrollProgress => Widget::ScrollProgress(ScrollProgress::mount(host)),
        WidgetKind::Glow { accent, intensity } => {
            Widget::Glow(GlowStyle::parse(accent, intensity)?)
        }
    };
    Ok(widget)
}

/// A mounted scene ready to run
pub struct Simulation {
    name: String,
    host: HostScheduler,
    localizer: Localizer,
    widgets: Vec<(String, Widget)>,
    script: Vec<ScriptStep>,
    locale_events: Receiver<LocaleChanged>,
    _locale_subscription: Subscription,
}

impl Simulation {
    /// Mount every widget of `scene` on a fresh host
    pub fn build(scene: &Scene, localizer: Localizer) -> Result<Self> {
        let config = &scene.config;
        let host = HostScheduler::with_viewport(config.viewport());
        let handle = host.handle();

        let regions: BTreeMap<&str, RegionId> = config
            .regions
            .iter()
            .map(|(name, region)| (name.as_str(), host.insert_region(region.rect())))
            .collect();

        let mut widgets = Vec::with_capacity(config.widgets.len());
        for widget in &config.widgets {
            let region = widget
                .kind
                .region()
                .and_then(|name| regions.get(name).copied());
            let mounted = mount_widget(&handle, &widget.kind, region, &localizer)
                .with_context(|| format!("Failed to mount widget '{}'", widget.name))?;
            debug!("mounted {} '{}'", widget.kind.label(), widget.name);
            widgets.push((widget.name.clone(), mounted));
        }

        let (sender, locale_events) = mpsc::channel();
        let subscription = localizer.subscribe(move |event| {
            // Receiver lives as long as the simulation
            let _ = sender.send(*event);
        });

        Ok(Self {
            name: config.scene.name.clone(),
            host,
            localizer,
            widgets,
            script: config.sorted_script(),
            locale_events,
            _locale_subscription: subscription,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Step the clock to `duration_ms`, writing one line per sample
    pub fn run<W: Write>(&self, options: RunOptions, out: &mut W) -> Result<()> {
        if options.step_ms == 0 || options.sample_ms == 0 {
            anyhow::bail!("Step and sample intervals must be greater than zero");
        }

        info!(
            "Simulating '{}' for {}ms ({} widgets, locale {})",
            self.name,
            options.duration_ms,
            self.widgets.len(),
            self.localizer.locale()
        );

        // First layout pass: evaluate visibility before the first sample
        self.host.advance(Duration::ZERO);

        let mut script = self.script.iter().peekable();
        let mut elapsed = 0u32;
        let mut next_sample = 0u32;
        loop {
            while let Some(step) = script.next_if(|step| step.at_ms <= elapsed) {
                self.apply(&step.action);
            }
            self.relocalize();

            if elapsed >= next_sample {
                writeln!(out, "{}", self.sample_line(elapsed)).context("Failed to write sample")?;
                next_sample = next_sample.saturating_add(options.sample_ms);
            }
            if elapsed >= options.duration_ms {
                break;
            }

            let step = options.step_ms.min(options.duration_ms - elapsed);
            self.host.advance(Duration::from_millis(u64::from(step)));
            elapsed += step;
        }
        Ok(())
    }

    fn apply(&self, action: &ScriptAction) {
        match action {
            ScriptAction::Scroll { x, y } => {
                debug!("script: scroll to ({}, {})", x, y);
                self.host.scroll_to(*x, *y);
            }
            ScriptAction::Resize { width, height } => {
                debug!("script: resize to {}x{}", width, height);
                self.host.resize(*width, *height);
            }
            ScriptAction::SetLocale { locale } => {
                self.localizer.set_locale(*locale);
            }
        }
    }

    /// Re-resolve keyed text after locale changes
    fn relocalize(&self) {
        let Some(event) = self.locale_events.try_iter().last() else {
            return;
        };
        info!(
            "Locale changed from {} to {} ({:?})",
            event.previous, event.locale, event.direction
        );
        for (_, widget) in &self.widgets {
            if let Widget::Typewriter {
                view,
                key: Some(key),
            } = widget
            {
                view.set_text(&self.localizer.translate(key));
            }
        }
    }

    fn sample_line(&self, elapsed: u32) -> String {
        let mut line = format!("{:>6}ms", elapsed);
        for (name, widget) in &self.widgets {
            line.push_str(&format!(" | {}={}", name, widget.sample(&self.localizer)));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use kinetic_i18n::{Catalog, Locale};
    use std::path::PathBuf;

    fn scene(source: &str) -> Scene {
        Scene {
            config: SceneConfig::parse(source).unwrap(),
            base_dir: PathBuf::from("."),
        }
    }

    fn run(simulation: &Simulation, options: RunOptions) -> Vec<String> {
        let mut out = Vec::new();
        simulation.run(options, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    const PAGE: &str = r#"
[scene]
name = "test page"
document_height = 2000

[regions]
stats = { x = 0, y = 100, width = 600, height = 100 }
list = { x = 0, y = 1500, width = 600, height = 200 }

[[widget]]
name = "hc"
kind = "counter"
region = "stats"
end = 1000
duration_ms = 2000

[[widget]]
name = "teams"
kind = "stagger"
region = "list"
items = 3
delay_ms = 100

[[script]]
at_ms = 1000
action = "scroll"
y = 1200
"#;

    #[test]
    fn test_samples_follow_the_clock() {
        let simulation = Simulation::build(&scene(PAGE), Localizer::default()).unwrap();
        assert_eq!(simulation.widget_count(), 2);

        let lines = run(
            &simulation,
            RunOptions {
                step_ms: 10,
                duration_ms: 2000,
                sample_ms: 1000,
            },
        );
        assert_eq!(
            lines,
            vec![
                "     0ms | hc=0 | teams=...",
                "  1000ms | hc=937 | teams=...",
                "  2000ms | hc=1,000 | teams=###",
            ]
        );
    }

    #[test]
    fn test_locale_switch_retranslates_typewriter() {
        let mut catalog = Catalog::new(Locale::En);
        catalog.insert(Locale::En, "title", "Hi");
        catalog.insert(Locale::Fr, "title", "Salut");
        let localizer = Localizer::new(catalog, Locale::En);

        let source = r#"
[scene]
name = "greeting"

[[widget]]
name = "title"
kind = "typewriter"
key = "title"
speed_ms = 10
cursor = "_"

[[script]]
at_ms = 100
action = "set_locale"
locale = "fr"
"#;
        let simulation = Simulation::build(&scene(source), localizer).unwrap();
        let lines = run(
            &simulation,
            RunOptions {
                step_ms: 10,
                duration_ms: 200,
                sample_ms: 100,
            },
        );
        assert_eq!(lines[0], "     0ms | title=\"_\"");
        assert_eq!(lines[1], "   100ms | title=\"_\"");
        assert_eq!(lines[2], "   200ms | title=\"Salut_\"");
    }

    #[test]
    fn test_bad_glow_fails_to_build() {
        let source = r#"
[scene]
name = "glow"

[[widget]]
name = "card"
kind = "glow"
accent = "magenta"
intensity = "low"
"#;
        assert!(Simulation::build(&scene(source), Localizer::default()).is_err());
    }

    #[test]
    fn test_zero_step_rejected() {
        let simulation = Simulation::build(&scene(PAGE), Localizer::default()).unwrap();
        let mut out = Vec::new();
        let options = RunOptions {
            step_ms: 0,
            ..RunOptions::default()
        };
        assert!(simulation.run(options, &mut out).is_err());
    }
}
