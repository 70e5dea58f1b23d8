//! Walk through a widget session against in-memory hosts

use geoshare::host::mock::{MockHosts, MockShareSheet};
use geoshare::{AcquisitionError, AppConfig, AppEvent, CopyField, LocationApp, PositionFix};

fn main() {
    geoshare::init_logging("geoshare=debug");

    println!("=== Geoshare - Session Demo ===\n");

    let mut mocks = MockHosts::new();
    mocks.share = MockShareSheet::unavailable();

    let mut app = LocationApp::new(AppConfig::default(), mocks.hosts());
    app.register_event_callback(Box::new(|event: AppEvent| {
        println!("   [event] {:?}", event);
    }));
    run_timers(&mut app, &mocks);

    println!("1. Two overlapping requests, the first answers late:");
    let first = app.request_location();
    let second = app.request_location();
    if let (Some(first), Some(second)) = (first, second) {
        app.deliver_position(second, Ok(PositionFix::new(52.52, 13.405, 12.4)));
        app.deliver_position(first, Err(AcquisitionError::Timeout));
    }
    run_timers(&mut app, &mocks);
    println!("   Decimal: {}", app.view().decimal.as_deref().unwrap_or("-"));
    println!("   DMS:     {}", app.view().dms.as_deref().unwrap_or("-"));
    println!("   Map:     {:?}\n", app.state().map);

    println!("2. Copy and share:");
    app.copy_field(CopyField::Dms);
    println!("   Notice: {:?}", app.view().notice);
    app.share_location();
    println!("   Clipboard: {:?}\n", mocks.clipboard.log().written.last());

    println!("3. Hide and restore the map:");
    app.toggle_map();
    println!("   Placeholder: {:?}", app.view().map_placeholder);
    app.toggle_map();
    run_timers(&mut app, &mocks);
    println!("   Map: {:?}\n", app.state().map);

    println!("4. Theme:");
    let theme = app.toggle_theme();
    println!("   Now {:?}", theme);
}

fn run_timers(app: &mut LocationApp, mocks: &MockHosts) {
    loop {
        let tasks = mocks.timer.take_pending();
        if tasks.is_empty() {
            break;
        }
        for task in tasks {
            app.run_task(task);
        }
    }
}
