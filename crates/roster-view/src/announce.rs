// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Sink for screen-reader announcements.
pub trait Announcer {
    fn announce(&mut self, message: &str);
}

impl<F> Announcer for F
where
    F: FnMut(&str),
{
    fn announce(&mut self, message: &str) {
        self(message);
    }
}

/// Keeps announcements in order; handy for front ends that show the latest
/// one and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementLog {
    messages: Vec<String>,
}

impl AnnouncementLog {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Announcer for AnnouncementLog {
    fn announce(&mut self, message: &str) {
        tracing::trace!(message, "announce");
        self.messages.push(message.to_owned());
    }
}
