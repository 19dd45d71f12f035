use crate::gui::theme::ThemeColors;
use cairo::Context;
use knobcore::Screen;
use knobcore::seekbar::is_bar_active;
use palette::Srgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarState {
    Active,
    Inactive,
}

impl BarState {
    fn resolve(index: usize, active_bars: usize) -> Self {
        if is_bar_active(index, active_bars) {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Active => colors.active,
            Self::Inactive => colors.inactive,
        }
    }
}

pub fn draw(
    cr: &Context,
    screen: &Screen,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let seek = screen.seek();
    let active_bars = screen.active_bars();

    for i in 0..seek.bars_count() {
        // nothing to lay out until the track has been measured
        let Some(rect) = seek.bar_rect(i, height) else {
            return Ok(());
        };

        let (r, g, b, a) = BarState::resolve(i, active_bars).color(colors).into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.rectangle(rect.x, rect.y, rect.width, rect.height);
        cr.fill()?;
    }
    Ok(())
}
