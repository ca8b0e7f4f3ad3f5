use chesslink::{
    CandidateMove, ClientEvent, ParseError, Participant, PieceKind, RosterPayload, ServerEvent,
    Square, WireMove,
};
use serde_json::json;

#[test]
fn outbound_move_uses_exact_event_names() {
    let event = ClientEvent::mv(&CandidateMove::new(Square::E2, Square::E4), "ROOM1");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({
            "event": "move",
            "data": {"move": {"from": "e2", "to": "e4", "promotion": "q"}, "room": "ROOM1"}
        })
    );
}

#[test]
fn outbound_reset_and_username() {
    let value = serde_json::to_value(ClientEvent::reset("ROOM1")).unwrap();
    assert_eq!(value, json!({"event": "gameReset", "data": {"room": "ROOM1"}}));

    let value = serde_json::to_value(ClientEvent::Username("alice".into())).unwrap();
    assert_eq!(value, json!({"event": "username", "data": "alice"}));
}

#[test]
fn inbound_events_parse() {
    let event: ServerEvent = serde_json::from_value(json!({
        "event": "move",
        "data": {"from": "e7", "to": "e5", "promotion": "q"}
    }))
    .unwrap();
    assert_eq!(
        event,
        ServerEvent::Move(WireMove {
            from: "e7".into(),
            to: "e5".into(),
            promotion: Some("q".into()),
        })
    );

    let event: ServerEvent = serde_json::from_str(r#"{"event":"gameReset"}"#).unwrap();
    assert_eq!(event, ServerEvent::GameReset);

    let event: ServerEvent =
        serde_json::from_str(r#"{"event":"playerDisconnected"}"#).unwrap();
    assert_eq!(event, ServerEvent::PlayerDisconnected);

    let event: ServerEvent = serde_json::from_value(json!({
        "event": "opponentJoined",
        "data": {"players": [{"username": "alice"}, {"username": "bob"}]}
    }))
    .unwrap();
    assert_eq!(
        event,
        ServerEvent::OpponentJoined(RosterPayload {
            players: vec![Participant::new("alice"), Participant::new("bob")],
        })
    );
}

#[test]
fn unknown_event_is_rejected() {
    let parsed: Result<ServerEvent, _> =
        serde_json::from_str(r#"{"event":"chat","data":"hello"}"#);
    assert!(parsed.is_err());
}

#[test]
fn wire_move_conversion() {
    let wire = WireMove {
        from: "E7".into(),
        to: "e8".into(),
        promotion: Some("n".into()),
    };
    let candidate = CandidateMove::try_from(&wire).unwrap();
    assert_eq!(candidate.from, Square::E7);
    assert_eq!(candidate.to, Square::E8);
    assert_eq!(candidate.promotion, Some(PieceKind::Knight));

    let plain = WireMove {
        from: "a2".into(),
        to: "a3".into(),
        promotion: None,
    };
    assert_eq!(CandidateMove::try_from(&plain).unwrap().promotion, None);

    let bad = WireMove {
        from: "i9".into(),
        to: "a3".into(),
        promotion: None,
    };
    assert_eq!(
        CandidateMove::try_from(&bad),
        Err(ParseError::Square("i9".into()))
    );

    let bad = WireMove {
        from: "a7".into(),
        to: "a8".into(),
        promotion: Some("qq".into()),
    };
    assert_eq!(
        CandidateMove::try_from(&bad),
        Err(ParseError::Promotion("qq".into()))
    );
}
