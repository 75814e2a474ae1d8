pub(crate) mod playback_session;
