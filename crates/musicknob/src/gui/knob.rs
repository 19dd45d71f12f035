use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use knobcore::Degrees;
use std::f64::consts::PI;

const BODY_FILL: f64 = 0.92;
const MARKER_INNER: f64 = 0.5;
const MARKER_OUTER: f64 = 0.8;
const MARKER_WIDTH: f64 = 0.08;

/// Draws the knob turned clockwise by `rotation` about the centre of the area.
pub fn draw(
    cr: &Context,
    width: f64,
    height: f64,
    rotation: Degrees,
    image: Option<&Pixbuf>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.translate(width / 2.0, height / 2.0);
    cr.rotate(rotation.to_radians());

    match image {
        Some(pixbuf) => draw_image(cr, pixbuf, width, height)?,
        None => draw_dial(cr, width.min(height) / 2.0, colors)?,
    }
    cr.restore()
}

fn draw_image(cr: &Context, pixbuf: &Pixbuf, width: f64, height: f64) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    // fit, keep aspect ratio
    let scale = (width / pw).min(height / ph);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, -pw / 2.0, -ph / 2.0);
    cr.paint()
}

fn draw_dial(cr: &Context, radius: f64, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.knob_body.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.arc(0.0, 0.0, radius * BODY_FILL, 0.0, 2.0 * PI);
    cr.fill_preserve()?;

    let (r, g, b, a) = colors.knob_rim.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.set_line_width(radius * 0.04);
    cr.stroke()?;

    // notch pointing "up" before rotation
    let (r, g, b, a) = colors.active.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.set_line_width(radius * MARKER_WIDTH);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.move_to(0.0, -radius * MARKER_INNER);
    cr.line_to(0.0, -radius * MARKER_OUTER);
    cr.stroke()
}
