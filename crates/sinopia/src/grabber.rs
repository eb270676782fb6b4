//! Frame grabbing coordination.
//!
//! [`WindowGrabber`] rides the host's frame-presented notifications: while
//! idle it forwards each frame as [`SceneEvent::Changed`]; on a grab request
//! it flips the overlay into grabbing mode (so the next frame renders
//! undecorated), pulls that frame through the host-provided [`FrameSource`],
//! suppresses the overlay-restore repaint, and emits one
//! [`SceneEvent::Grabbed`].

use std::io;
use std::path::Path;

use image::RgbaImage;
use log::{debug, trace};
use sinopia_core::{ChangeEvent, Delivery, Interest, SceneTree, SubscriptionId, WindowId};

use crate::overlay::OverlayItem;

/// Host-provided hook that turns a presented frame into pixels. The
/// inspector never owns a rendering surface itself.
pub trait FrameSource {
    fn grab_window(&mut self, tree: &SceneTree, window: WindowId) -> Option<RgbaImage>;
}

/// One captured frame plus the scale factor needed to map its pixels back to
/// logical coordinates.
#[derive(Debug, Clone)]
pub struct GrabbedFrame {
    pub image: RgbaImage,
    pub device_pixel_ratio: f32,
}

/// Outbound events for the inspector UI.
#[derive(Debug, Clone)]
pub enum SceneEvent {
    /// The scene rendered a frame while the grabber was idle.
    Changed,
    /// A requested capture completed.
    Grabbed(GrabbedFrame),
}

pub struct WindowGrabber {
    window: Option<WindowId>,
    frame_sub: Option<SubscriptionId>,
    /// Suppress the next frame notification: set after a capture so the
    /// repaint that restores the overlay is not reported as a scene change.
    filter_next: bool,
}

impl Default for WindowGrabber {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowGrabber {
    pub fn new() -> Self {
        Self {
            window: None,
            frame_sub: None,
            filter_next: false,
        }
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    /// Watch `window`'s presented frames; `None` detaches completely.
    /// Switching windows force-disables the overlay's grabbing mode so a
    /// pending capture cannot complete against the wrong window.
    pub fn set_window(
        &mut self,
        tree: &mut SceneTree,
        overlay: &mut OverlayItem,
        window: Option<WindowId>,
    ) {
        if self.window == window {
            return;
        }

        if let Some(sub) = self.frame_sub.take() {
            tree.bus_mut().unsubscribe(sub);
        }
        overlay.set_grabbing(false);
        self.filter_next = false;

        self.window = window;
        if let Some(window) = window {
            self.frame_sub = Some(tree.bus_mut().subscribe(Interest::Frames { window }));
            debug!("grabber watching window {window:?}");
        } else {
            debug!("grabber detached");
        }
    }

    /// Ask for one clean capture on the next presented frame. A no-op while
    /// a capture is already pending, or without a window.
    pub fn request_grab(&mut self, overlay: &mut OverlayItem) {
        if self.window.is_none() {
            debug!("grab requested without a window, ignoring");
            return;
        }
        if overlay.is_grabbing() {
            return;
        }
        overlay.set_grabbing(true);
    }

    /// Route one drained delivery. Returns the outbound event, if any.
    pub fn handle_frame(
        &mut self,
        tree: &SceneTree,
        overlay: &mut OverlayItem,
        source: &mut dyn FrameSource,
        delivery: &Delivery,
    ) -> Option<SceneEvent> {
        if self.frame_sub != Some(delivery.subscription) {
            return None;
        }
        let window = match delivery.event {
            ChangeEvent::FramePresented { window } if Some(window) == self.window => window,
            _ => {
                trace!("dropping frame delivery for unwatched window");
                return None;
            }
        };

        if self.filter_next {
            self.filter_next = false;
            return None;
        }

        if overlay.is_grabbing() {
            // This frame rendered without decoration; pull it, then swallow
            // the repaint that follows the overlay coming back.
            self.filter_next = true;
            let image = source.grab_window(tree, window);
            overlay.set_grabbing(false);

            image.map(|image| {
                SceneEvent::Grabbed(GrabbedFrame {
                    image,
                    device_pixel_ratio: tree.device_pixel_ratio(window).unwrap_or(1.0),
                })
            })
        } else {
            Some(SceneEvent::Changed)
        }
    }
}

/// Persist a captured frame as PNG.
pub fn write_frame_png(frame: &GrabbedFrame, path: &Path) -> io::Result<()> {
    frame
        .image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
