//! A whole dashboard page driven through one simulated host

use kinetic_animation::{
    Counter, CounterConfig, FadeDirection, FadeInConfig, FadeInView, MorphConfig, Morphing,
    Parallax, ParallaxConfig, Presentation, ScrollProgress, StaggerConfig, StaggeredList,
    Typewriter, TypewriterConfig,
};
use kinetic_core::{HostScheduler, Rect};
use kinetic_i18n::{Locale, Localizer};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

struct Widgets {
    headline: Typewriter,
    headcount: Counter,
    retention: Counter,
    departments: StaggeredList,
    chart: FadeInView,
    backdrop: Parallax,
    badge: Morphing<&'static str>,
    progress: ScrollProgress,
}

fn build_page() -> (HostScheduler, Widgets) {
    let host = HostScheduler::new();
    host.set_document_height(3200.0);
    let handle = host.handle();

    let stats = host.insert_region(Rect::new(0.0, 200.0, 1200.0, 180.0));
    let list = host.insert_region(Rect::new(0.0, 1400.0, 1200.0, 300.0));
    let chart = host.insert_region(Rect::new(0.0, 2400.0, 1200.0, 500.0));

    let widgets = Widgets {
        headline: Typewriter::mount(&handle, TypewriterConfig::new("People at a glance")),
        headcount: Counter::mount(&handle, Some(stats), CounterConfig::new(1000)).unwrap(),
        retention: Counter::mount(
            &handle,
            Some(stats),
            CounterConfig::new(94).duration_ms(1200).suffix("%"),
        )
        .unwrap(),
        departments: StaggeredList::mount(&handle, Some(list), 5, StaggerConfig::new(80)).unwrap(),
        chart: FadeInView::mount(
            &handle,
            Some(chart),
            FadeInConfig::new(FadeDirection::Up).delay_ms(100),
        )
        .unwrap(),
        backdrop: Parallax::mount(&handle, ParallaxConfig::new(0.5)).unwrap(),
        badge: Morphing::mount(
            &handle,
            vec!["hiring", "onboarding", "growing"],
            MorphConfig::default(),
        )
        .unwrap(),
        progress: ScrollProgress::mount(&handle),
    };
    (host, widgets)
}

fn run_for(host: &HostScheduler, ms: u64) {
    for _ in 0..ms / 16 {
        host.advance(FRAME);
    }
}

#[test]
fn above_the_fold_animates_immediately() {
    let (host, page) = build_page();
    run_for(&host, 2400);

    assert_eq!(page.headline.output(), "People at a glance");
    assert_eq!(page.headcount.value(), 1000);
    assert_eq!(page.retention.display(Locale::En), "94%");
    assert!(page.headcount.is_complete());

    // Below the fold nothing has moved
    assert_eq!(page.departments.revealed_count(), 0);
    assert!(!page.chart.is_visible());
    assert_eq!(page.badge.active_index(), 0);
    assert_eq!(page.progress.percent(), 0);
}

#[test]
fn scrolling_down_reveals_sections_in_turn() {
    let (host, page) = build_page();
    run_for(&host, 160);

    host.scroll_to(0.0, 1100.0);
    assert_eq!(page.backdrop.offset(), -550.0);
    run_for(&host, 800);
    assert!(page.departments.is_complete());
    assert!(!page.chart.is_triggered());

    host.scroll_to(0.0, 2400.0);
    assert_eq!(page.progress.percent(), 100);
    run_for(&host, 1200);
    assert!(page.chart.is_visible());
    assert_eq!(page.chart.presentation(), Presentation::IDENTITY);

    // Scrolling back up and down again replays nothing
    host.scroll_to(0.0, 0.0);
    run_for(&host, 160);
    host.scroll_to(0.0, 1100.0);
    run_for(&host, 160);
    assert!(page.departments.is_complete());
    assert_eq!(host.observer_count(), 0);
    assert_eq!(host.frame_count(), 0);
    // Only the badge interval keeps running
    assert_eq!(host.timer_count(), 1);
}

#[test]
fn badge_cycles_while_mounted() {
    let (host, page) = build_page();
    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(*page.badge.active());
        host.advance(Duration::from_millis(3000));
    }
    assert_eq!(seen, vec!["hiring", "onboarding", "growing", "hiring"]);
}

#[test]
fn unmounting_mid_flight_leaves_nothing_behind() {
    let (host, page) = build_page();
    run_for(&host, 320);
    assert!(page.headcount.is_running());
    assert!(host.registration_count() > 0);

    drop(page);
    assert_eq!(host.registration_count(), 0);
    assert!(!host.advance(Duration::from_millis(5000)));
}

#[test]
fn locale_change_reformats_without_restarting() {
    let (host, page) = build_page();
    let localizer = Localizer::default();
    run_for(&host, 2400);
    let value = page.headcount.value();

    assert!(localizer.set_locale(Locale::De));
    assert_eq!(page.headcount.display(localizer.locale()), "1.000");
    assert_eq!(page.headcount.value(), value);
}
