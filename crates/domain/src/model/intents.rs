use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Gateway event categories a bot subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Intents: u32 {
        const GUILDS = 1 << 0;
        const GUILD_MEMBERS = 1 << 1;
        const GUILD_MODERATION = 1 << 2;
        const GUILD_EMOJIS_AND_STICKERS = 1 << 3;
        const GUILD_INTEGRATIONS = 1 << 4;
        const GUILD_WEBHOOKS = 1 << 5;
        const GUILD_INVITES = 1 << 6;
        const GUILD_VOICE_STATES = 1 << 7;
        const GUILD_PRESENCES = 1 << 8;
        const GUILD_MESSAGES = 1 << 9;
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        const GUILD_MESSAGE_TYPING = 1 << 11;
        const DIRECT_MESSAGES = 1 << 12;
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        const DIRECT_MESSAGE_TYPING = 1 << 14;
    }
}

/// Request body for `PATCH /applications/@me/bot`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntentsPatch {
    pub intents: u32,
}

/// Caller-facing switch: `all: true` enables every intent, `all: false`
/// leaves the bot's current intents untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentsOptions {
    pub all: bool,
}

impl IntentsOptions {
    /// The patch to send, or `None` when nothing should be sent.
    pub fn to_patch(self) -> Option<IntentsPatch> {
        self.all.then(|| IntentsPatch {
            intents: Intents::all().bits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_intents_is_32767() {
        assert_eq!(Intents::all().bits(), 32767);
    }

    #[test]
    fn options_all_produces_full_patch() {
        let patch = IntentsOptions { all: true }.to_patch().unwrap();
        assert_eq!(patch.intents, 32767);
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"intents":32767}"#
        );
    }

    #[test]
    fn options_not_all_produces_nothing() {
        assert!(IntentsOptions { all: false }.to_patch().is_none());
    }
}
