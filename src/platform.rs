//! Host platform detection, resolved once into a capability record so window
//! option computation never branches on the operating system directly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostPlatform {
    MacOs,
    Windows,
    Other,
}

impl HostPlatform {
    pub(crate) fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlatformCapabilities {
    pub(crate) supports_vibrancy: bool,
    pub(crate) hides_title_bar: bool,
    pub(crate) suppresses_frame: bool,
}

impl PlatformCapabilities {
    pub(crate) fn for_platform(platform: HostPlatform) -> Self {
        match platform {
            HostPlatform::MacOs => Self {
                supports_vibrancy: true,
                hides_title_bar: true,
                suppresses_frame: false,
            },
            HostPlatform::Windows => Self {
                supports_vibrancy: false,
                hides_title_bar: false,
                suppresses_frame: true,
            },
            HostPlatform::Other => Self {
                supports_vibrancy: false,
                hides_title_bar: false,
                suppresses_frame: false,
            },
        }
    }

    pub(crate) fn current() -> Self {
        Self::for_platform(HostPlatform::current())
    }
}

/// Console greeting printed once the first main window exists. The Windows
/// console historically mangles emoji, so it gets the plain variant.
pub(crate) fn greeting_for(platform: HostPlatform) -> &'static str {
    match platform {
        HostPlatform::Windows => "\n Welcome to Ghost \n",
        HostPlatform::MacOs | HostPlatform::Other => "\n ⚡️  Welcome to Ghost  👻\n",
    }
}
