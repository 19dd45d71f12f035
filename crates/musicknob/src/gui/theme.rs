use crate::config::{AppearanceConfig, Config};
use gdk_pixbuf::Pixbuf;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub active: Srgba<f64>,
    pub inactive: Srgba<f64>,
    pub knob_body: Srgba<f64>,
    pub knob_rim: Srgba<f64>,
}

impl ThemeColors {
    /// Bar colours come from the config; the knob body follows the GTK theme.
    pub fn from_context(context: &gtk::StyleContext, appearance: &AppearanceConfig) -> Self {
        Self {
            active: appearance.active.to_srgba(),
            inactive: appearance.inactive.to_srgba(),
            knob_body: Self::lookup_color(
                context,
                "theme_unfocused_bg_color",
                Srgba::new(0.22, 0.22, 0.22, 1.0),
                Some(1.0),
            ),
            knob_rim: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.08, 0.08, 0.08, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// Live-reloadable part of the look: colours and the optional knob bitmap.
pub struct Appearance {
    pub config: AppearanceConfig,
    pub knob_image: Option<Pixbuf>,
}

impl Appearance {
    pub fn load(config: &AppearanceConfig) -> Self {
        let knob_image = config.knob_image.as_ref().and_then(|path| {
            Pixbuf::from_file(path)
                .inspect_err(|e| {
                    log::warn!("Failed to load knob image {}: {}", path.display(), e)
                })
                .ok()
        });

        Self {
            config: config.clone(),
            knob_image,
        }
    }
}

fn css_for(config: &Config) -> String {
    let appearance = &config.appearance;
    format!(
        "
.musicknob-window {{
    background-color: {background};
}}
.musicknob-panel {{
    border: 1px solid {border};
    border-radius: 10px;
    padding: {padding}px;
    margin: 24px;
}}
",
        background = appearance.background,
        border = appearance.border,
        padding = config.layout.padding,
    )
}

pub fn load_css(provider: &gtk::CssProvider, config: &Config) {
    provider.load_from_data(&css_for(config));
}

pub fn install_css(config: &Config) -> gtk::CssProvider {
    let provider = gtk::CssProvider::new();
    load_css(&provider, config);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
    provider
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexColor;

    #[test]
    fn test_css_uses_configured_colors() {
        let mut config = Config::default();
        config.appearance.border = HexColor::new(0xff, 0x00, 0x80);
        config.layout.padding = 12;

        let css = css_for(&config);
        assert!(css.contains("background-color: #121212;"));
        assert!(css.contains("border: 1px solid #ff0080;"));
        assert!(css.contains("padding: 12px;"));
    }
}
