use anyhow::Context;
use web_time::Instant;

use tvshell_core::*;

/// Controller state for one activity. All methods run on the UI thread.
pub struct ShellActivity<V, W, P, H> {
    config: ShellConfig,
    window: W,
    platform: P,
    host: H,
    web: Option<V>,
    queue: UiQueue,
    resolver: NavigationResolver,
    presentation: PresentationController,
}

impl<V, W, P, H> ShellActivity<V, W, P, H>
where
    V: WebViewHandle,
    W: WindowSurface,
    P: PlatformInfo,
    H: HostActivity,
{
    /// Paints the status bar, switches it to light icons, and fixes whether
    /// inset compensation applies for the rest of the process.
    pub fn on_create(
        config: ShellConfig,
        mut window: W,
        platform: P,
        host: H,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid shell config")?;
        let resolver = NavigationResolver::from_config(&config)?;

        window.set_status_bar_color(config.chrome_color);
        let flags = window.system_ui_flags() - SystemUiFlags::LIGHT_STATUS_BAR;
        window.set_system_ui_flags(flags);

        let compensation = InsetCompensation::detect(
            &platform,
            config.edge_to_edge_min_api,
            config.fallback_status_bar_dp,
        );
        log::info!(
            "shell created (api {}, inset compensation {})",
            platform.api_level(),
            if compensation.required() { "on" } else { "off" }
        );

        let presentation = PresentationController::new(compensation, &platform);

        Ok(Self {
            config,
            window,
            platform,
            host,
            web: None,
            queue: UiQueue::new(),
            resolver,
            presentation,
        })
    }

    /// Attaches the web view, pads its container below the status bar when
    /// needed, and exposes the fullscreen bridge to page script.
    pub fn on_start(&mut self, web: V) {
        self.presentation.attach(&mut self.window);
        if self.presentation.compensation_required() {
            self.window.set_content_background(self.config.chrome_color);
        }
        web.add_bridge(&self.config.bridge_name, self.bridge());
        self.web = Some(web);
    }

    pub fn on_back_pressed(&mut self) -> BackDisposition {
        let web = self.web.as_ref().map(|w| w as &dyn WebViewHandle);
        self.resolver.on_back(web, &self.queue.handle(), &mut self.host)
    }

    /// Runs everything posted to the UI queue, then checks the probe
    /// timeout. Returns the back outcomes resolved during this pump.
    pub fn pump(&mut self) -> Vec<NavigationQueryResult> {
        let mut resolved = Vec::new();
        for task in self.queue.drain() {
            match task {
                UiTask::EnterImmersive => self.presentation.enter(&mut self.window),
                UiTask::ExitImmersive => self.presentation.exit(&mut self.window),
                UiTask::ProbeCompleted { id, result } => {
                    let web = self.web.as_ref().map(|w| w as &dyn WebViewHandle);
                    if let Some(outcome) = self.resolver.complete(id, result, web, &mut self.host) {
                        resolved.push(outcome);
                    }
                }
            }
        }

        let web = self.web.as_ref().map(|w| w as &dyn WebViewHandle);
        if let Some(outcome) = self.resolver.check_timeout(Instant::now(), web, &mut self.host) {
            resolved.push(outcome);
        }
        resolved
    }

    /// Bridge object as exposed to page script.
    pub fn bridge(&self) -> FullscreenBridge {
        FullscreenBridge::new(self.queue.handle())
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn web_view(&self) -> Option<&V> {
        self.web.as_ref()
    }

    pub fn presentation(&self) -> &PresentationController {
        &self.presentation
    }

    pub fn is_probing(&self) -> bool {
        self.resolver.is_probing()
    }
}
