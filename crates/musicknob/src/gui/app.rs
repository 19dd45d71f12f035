use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, Appearance, ThemeColors};
use crate::gui::{knob, seekbar};
use gtk::glib::WeakRef;
use gtk::prelude::*;
use gtk4 as gtk;
use knobcore::{Screen, Size, TouchEvent, TouchPhase};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub screen: Rc<RefCell<Screen>>,
    pub appearance: Rc<RefCell<Appearance>>,
    pub config: Config,
    pub css: gtk::CssProvider,
    pub knob_area: WeakRef<gtk::DrawingArea>,
    pub seek_area: WeakRef<gtk::DrawingArea>,
}

impl AppModel {
    fn redraw(&self) {
        queue_draw(&[&self.knob_area, &self.seek_area]);
    }
}

fn queue_draw(areas: &[&WeakRef<gtk::DrawingArea>]) {
    areas
        .iter()
        .filter_map(|area| area.upgrade())
        .for_each(|area| area.queue_draw());
}

#[derive(Debug)]
pub enum AppMsg {
    KnobTouch(TouchEvent),
    SeekTouch(TouchEvent),
    KnobResized(i32, i32),
    SeekResized(i32),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Drag signals report offsets from the press point; the controllers want
/// widget coordinates.
fn drag_sample(
    start: Option<(f64, f64)>,
    offset: (f64, f64),
    phase: TouchPhase,
) -> Option<TouchEvent> {
    let (x, y) = start?;
    Some(TouchEvent::new(x + offset.0, y + offset.1, phase))
}

/// Feeds press/drag/release on a widget into the app as touch samples.
fn touch_controller(
    sender: &ComponentSender<AppModel>,
    msg: fn(TouchEvent) -> AppMsg,
) -> gtk::GestureDrag {
    let drag = gtk::GestureDrag::new();

    let s = sender.clone();
    drag.connect_drag_begin(move |_, x, y| {
        if let Some(event) = drag_sample(Some((x, y)), (0.0, 0.0), TouchPhase::Down) {
            s.input(msg(event));
        }
    });

    let s = sender.clone();
    drag.connect_drag_update(move |gesture, dx, dy| {
        if let Some(event) = drag_sample(gesture.start_point(), (dx, dy), TouchPhase::Move) {
            s.input(msg(event));
        }
    });

    let s = sender.clone();
    drag.connect_drag_end(move |gesture, dx, dy| {
        if let Some(event) = drag_sample(gesture.start_point(), (dx, dy), TouchPhase::Up) {
            s.input(msg(event));
        }
    });

    drag
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Music Knob"),
            set_default_size: (640, 260),
            add_css_class: "musicknob-window",

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_valign: gtk::Align::Center,
                set_spacing: model.config.layout.spacing,
                add_css_class: "musicknob-panel",

                #[name = "knob_area"]
                gtk::DrawingArea {
                    set_content_width: model.config.layout.knob_size,
                    set_content_height: model.config.layout.knob_size,
                    set_valign: gtk::Align::Center,
                    add_controller: touch_controller(&sender, AppMsg::KnobTouch),
                    connect_resize[sender] => move |_, w, h| {
                        sender.input(AppMsg::KnobResized(w, h));
                    },
                },

                #[name = "seek_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_width_request: model.config.layout.seek_min_width,
                    set_content_height: model.config.layout.seek_height,
                    set_valign: gtk::Align::Center,
                    add_controller: touch_controller(&sender, AppMsg::SeekTouch),
                    connect_resize[sender] => move |_, w, _| {
                        sender.input(AppMsg::SeekResized(w));
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        let css = theme::install_css(&config);
        let screen = config.screen().unwrap_or_else(|e| {
            log::error!("Invalid knob geometry, using defaults: {}", e);
            Screen::default()
        });
        let appearance = Appearance::load(&config.appearance);

        let model = AppModel {
            screen: Rc::new(RefCell::new(screen)),
            appearance: Rc::new(RefCell::new(appearance)),
            config,
            css,
            knob_area: WeakRef::new(),
            seek_area: WeakRef::new(),
        };

        let widgets = view_output!();

        model.knob_area.set(Some(&widgets.knob_area));
        model.seek_area.set(Some(&widgets.seek_area));

        let (screen_draw, appearance_draw) = (model.screen.clone(), model.appearance.clone());
        widgets
            .knob_area
            .set_draw_func(move |area, cr, width, height| {
                let appearance = appearance_draw.borrow();
                let colors = ThemeColors::from_context(&area.style_context(), &appearance.config);
                let rotation = screen_draw.borrow().rotation();
                if let Err(e) = knob::draw(
                    cr,
                    width as f64,
                    height as f64,
                    rotation,
                    appearance.knob_image.as_ref(),
                    &colors,
                ) {
                    log::error!("Knob drawing error: {}", e);
                }
            });

        let (screen_draw, appearance_draw) = (model.screen.clone(), model.appearance.clone());
        widgets
            .seek_area
            .set_draw_func(move |area, cr, _, height| {
                let appearance = appearance_draw.borrow();
                let colors = ThemeColors::from_context(&area.style_context(), &appearance.config);
                if let Err(e) = seekbar::draw(cr, &screen_draw.borrow(), height as f64, &colors) {
                    log::error!("Seek bar drawing error: {}", e);
                }
            });

        // both controls redraw from the shared state on every change
        let (knob_weak, seek_weak) = (model.knob_area.clone(), model.seek_area.clone());
        model.screen.borrow_mut().subscribe(move |snapshot| {
            log::trace!(
                "Volume {:.3}, rotation {:.1}°",
                snapshot.volume,
                *snapshot.rotation
            );
            queue_draw(&[&knob_weak, &seek_weak]);
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::KnobTouch(event) => {
                if let Some(snapshot) = self.screen.borrow_mut().knob_touch(event) {
                    log::debug!("Knob set volume to {:.3}", snapshot.volume);
                }
            }
            AppMsg::SeekTouch(event) => {
                if let Some(snapshot) = self.screen.borrow_mut().seek_touch(event) {
                    log::debug!("Seek bar set volume to {:.3}", snapshot.volume);
                }
            }
            AppMsg::KnobResized(w, h) => {
                let size = Size::new(w as f64, h as f64);
                if self.screen.borrow_mut().knob_mut().measure(size) {
                    log::debug!("Knob centre fixed at {:?}", size.center());
                }
            }
            AppMsg::SeekResized(w) => {
                if self.screen.borrow_mut().seek_mut().measure(w as f64) {
                    log::debug!("Seek track fixed at {}px", w);
                    self.redraw();
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    if self.config.requires_restart(&new_config) {
                        log::warn!("Knob geometry and layout changes apply after a restart");
                    }
                    *self.appearance.borrow_mut() = Appearance::load(&new_config.appearance);
                    self.config.appearance = new_config.appearance;
                    theme::load_css(&self.css, &self.config);

                    self.redraw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_sample_adds_offset_to_press_point() {
        let cases = vec![
            ((0.0, 0.0), TouchPhase::Down, (40.0, 12.0)),
            ((15.5, -4.0), TouchPhase::Move, (55.5, 8.0)),
            ((-40.0, 3.0), TouchPhase::Up, (0.0, 15.0)),
        ];

        for (offset, phase, (x, y)) in cases {
            let event = drag_sample(Some((40.0, 12.0)), offset, phase).unwrap();
            assert_eq!(event, TouchEvent::new(x, y, phase));
        }
    }

    #[test]
    fn test_drag_sample_without_press_point() {
        assert_eq!(drag_sample(None, (5.0, 5.0), TouchPhase::Move), None);
    }
}
