//! Headless demo driver: mounts the widget against an image file, replays a
//! short annotation session, and prints everything the host would receive.
//!
//! Usage: `bbat-demo [image-path]`

use std::env;

use bbat::completion::PayloadEntry;
use bbat::geometry::Point;
use bbat::host::{HostSink, InitArgs};
use bbat::message::{Event, Key};
use bbat::widget::BboxWidget;

/// Host double that prints each outbound message to stdout.
struct StdoutHost;

impl HostSink for StdoutHost {
    fn report_height(&mut self, pixels: f32) {
        println!("frame height: {pixels:.1}px");
    }

    fn submit(&mut self, payload: &[PayloadEntry]) {
        match serde_json::to_string_pretty(payload) {
            Ok(json) => println!("submitted payload:\n{json}"),
            Err(e) => eprintln!("failed to serialize payload: {e}"),
        }
    }
}

fn image_size(path: Option<&str>) -> [f32; 2] {
    let Some(path) = path else {
        return [800.0, 600.0];
    };
    match image::image_dimensions(path) {
        Ok((w, h)) => [w as f32, h as f32],
        Err(e) => {
            log::warn!("could not read {path}: {e}; using 800x600");
            [800.0, 600.0]
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let image_path = args.get(1).map(String::as_str);
    let image_size = image_size(image_path);
    println!(
        "image: {} ({}x{})",
        image_path.unwrap_or("<none>"),
        image_size[0],
        image_size[1]
    );

    let init = InitArgs {
        image_url: image_path.unwrap_or("demo.png").to_string(),
        image_size,
        label_list: vec!["cat".to_string(), "dog".to_string()],
        bbox_info: Vec::new(),
        color_map: Default::default(),
        line_width: 3.0,
        enable_keyboard_submit: true,
    };

    let mut host = StdoutHost;
    let mut widget = match BboxWidget::mount(init, None, 1280.0, &mut host) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("mount failed: {e}");
            std::process::exit(1);
        }
    };

    // Draw one box per label, then submit with the keyboard shortcut.
    let boxes = [
        ("cat", Point::new(40.0, 40.0), Point::new(160.0, 140.0)),
        ("dog", Point::new(220.0, 80.0), Point::new(340.0, 220.0)),
    ];
    for (label, from, to) in boxes {
        widget.handle_event(Event::LabelPicked(label.to_string()), &mut host);
        widget.handle_event(Event::PointerDown(from), &mut host);
        widget.handle_event(Event::PointerMoved(to), &mut host);
        widget.handle_event(Event::PointerReleased(to), &mut host);
    }

    let view = widget.view();
    println!("canvas: {:.0}x{:.0}", view.width, view.height);
    for rect in &view.rects {
        println!(
            "  {} at ({:.0},{:.0}) {:.0}x{:.0} stroke {}",
            rect.id, rect.x, rect.y, rect.width, rect.height, rect.stroke
        );
    }

    widget.handle_event(Event::KeyPressed(Key::Space), &mut host);
}
