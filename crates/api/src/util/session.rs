use engine::SessionId;

/// Renders a session ID as the 16-digit hexadecimal token handed to clients.
pub fn encode_session(id: SessionId) -> String {
    hex::encode(id.to_be_bytes())
}

/// Parses a token produced by [`encode_session`].
pub fn decode_session(token: &str) -> Option<SessionId> {
    let mut bytes = [0; 8];
    hex::decode_to_slice(token, &mut bytes).ok()?;
    Some(SessionId::from_be_bytes(bytes))
}
