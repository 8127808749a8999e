use crate::{platform::PlatformCapabilities, window_state::WindowBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TitleBarStyle {
    Default,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vibrancy {
    Dark,
}

/// Creation options for a main window. Computed per creation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowOptions {
    pub(crate) show: bool,
    pub(crate) title_bar_style: TitleBarStyle,
    pub(crate) frame: bool,
    pub(crate) transparent: bool,
    pub(crate) vibrancy: Option<Vibrancy>,
    pub(crate) bounds: Option<WindowBounds>,
}

impl WindowOptions {
    /// Default chrome for `capabilities`. Windows start hidden and are revealed
    /// once their content has finished loading.
    pub(crate) fn defaults(capabilities: PlatformCapabilities, vibrancy_enabled: bool) -> Self {
        let transparent = capabilities.supports_vibrancy && vibrancy_enabled;
        Self {
            show: false,
            title_bar_style: if capabilities.hides_title_bar {
                TitleBarStyle::Hidden
            } else {
                TitleBarStyle::Default
            },
            frame: !capabilities.suppresses_frame,
            transparent,
            vibrancy: transparent.then_some(Vibrancy::Dark),
            bounds: None,
        }
    }

    pub(crate) fn with_bounds(self, bounds: WindowBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostPlatform;

    fn options_for(platform: HostPlatform, vibrancy_enabled: bool) -> WindowOptions {
        WindowOptions::defaults(
            PlatformCapabilities::for_platform(platform),
            vibrancy_enabled,
        )
    }

    #[test]
    fn defaults_match_platform_table() {
        let mac = options_for(HostPlatform::MacOs, false);
        assert_eq!(mac.title_bar_style, TitleBarStyle::Hidden);
        assert!(mac.frame);

        let windows = options_for(HostPlatform::Windows, false);
        assert_eq!(windows.title_bar_style, TitleBarStyle::Default);
        assert!(!windows.frame);

        let other = options_for(HostPlatform::Other, false);
        assert_eq!(other.title_bar_style, TitleBarStyle::Default);
        assert!(other.frame);

        for options in [mac, windows, other] {
            assert!(!options.show);
            assert_eq!(options.bounds, None);
        }
    }

    #[test]
    fn transparency_requires_vibrancy_support_and_preference() {
        for platform in [HostPlatform::MacOs, HostPlatform::Windows, HostPlatform::Other] {
            for vibrancy_enabled in [false, true] {
                let options = options_for(platform, vibrancy_enabled);
                let expected = platform == HostPlatform::MacOs && vibrancy_enabled;
                assert_eq!(options.transparent, expected, "{platform:?} {vibrancy_enabled}");
                assert_eq!(
                    options.vibrancy,
                    expected.then_some(Vibrancy::Dark),
                    "{platform:?} {vibrancy_enabled}"
                );
            }
        }
    }

    #[test]
    fn with_bounds_overrides_only_bounds() {
        let defaults = options_for(HostPlatform::MacOs, true);
        let bounds = WindowBounds {
            x: Some(10.0),
            y: Some(20.0),
            width: 1280.0,
            height: 720.0,
            is_maximized: false,
            is_full_screen: false,
        };

        let merged = defaults.with_bounds(bounds);

        assert_eq!(merged.bounds, Some(bounds));
        assert_eq!(merged, WindowOptions { bounds: Some(bounds), ..defaults });
    }
}
