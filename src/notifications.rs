// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Short-lived user notifications (toasts).

use std::time::{Duration, Instant};

/// Kind of notification, drives the toast colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
    Achievement,
}

/// A single notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

/// Sink for user-facing notifications.
pub trait Notify {
    fn notify(&mut self, message: String, level: NoticeLevel);
}

/// Queue of notifications displayed in the corner of the window.
pub struct Notifications {
    queue: Vec<(Notice, Instant)>,
    lifetime: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            queue: Vec::new(),
            lifetime,
        }
    }

    /// Drop notifications older than their lifetime.
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.queue
            .retain(|(_, created)| now.saturating_duration_since(*created) < lifetime);
    }

    pub fn active(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter().map(|(notice, _)| notice)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Render the active notifications as stacked toasts.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.expire(Instant::now());
        if self.queue.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for notice in self.active() {
                    let fill = match notice.level {
                        NoticeLevel::Info => egui::Color32::from_rgb(0x37, 0x37, 0x37),
                        NoticeLevel::Success => egui::Color32::from_rgb(0x2e, 0x7d, 0x32),
                        NoticeLevel::Error => egui::Color32::from_rgb(0xc6, 0x28, 0x28),
                        NoticeLevel::Achievement => egui::Color32::from_rgb(0x07, 0x57, 0x5b),
                    };
                    egui::Frame::none()
                        .fill(fill)
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(&notice.message).color(egui::Color32::WHITE));
                        });
                    ui.add_space(6.0);
                }
            });

        // Keep repainting so toasts disappear on time
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl Notify for Notifications {
    fn notify(&mut self, message: String, level: NoticeLevel) {
        log::info!("Notification ({:?}): {}", level, message);
        self.queue.push((Notice { message, level }, Instant::now()));
    }
}
