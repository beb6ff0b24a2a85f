//! Wire-level contract: request bodies, hub answers, and the registry as seen
//! from outside the crate.

use hmproto::domain::Device;
use hmproto::request::{AddDeviceRequest, LoginRequest, MoveDeviceRequest, SearchPluginsRequest};
use hmproto::responses::{DevicesResponse, TokenResponse};
use hmproto::{
    error_set_for, response_for, Envelope, ErrorCode, ErrorKind, HubCall, HubError, HubRequest,
    ObjectKind, ParameterPath, PathSegment, RequestKind,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn login_body_has_no_token() {
    let request: HubRequest = LoginRequest {
        username: "admin".into(),
        password: "correct".into(),
        device: "test".into(),
    }
    .into();

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"type": "account.login", "username": "admin", "password": "correct", "device": "test"})
    );
}

#[test]
fn nested_request_uses_camel_case() {
    let request: HubRequest = AddDeviceRequest {
        room_id: "kitchen".into(),
        device: Device {
            id: "lamp".into(),
            name: "Lamp".into(),
            icon: "lightbulb".into(),
            device_type: "hue.light".into(),
            ..Default::default()
        },
    }
    .into();

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["type"], "devices.addDevice");
    assert_eq!(json["roomId"], "kitchen");
    assert_eq!(json["device"]["type"], "hue.light");
}

#[test]
fn request_parses_from_hub_json() {
    let parsed: HubRequest = serde_json::from_value(json!({
        "type": "devices.moveDevice",
        "roomId": "a",
        "id": "lamp",
        "newRoomId": "b"
    }))
    .unwrap();

    assert_eq!(
        parsed,
        HubRequest::DevicesMoveDevice(MoveDeviceRequest {
            room_id: "a".into(),
            id: "lamp".into(),
            new_room_id: "b".into(),
        })
    );
}

#[test]
fn unknown_request_type_is_rejected() {
    let result = serde_json::from_value::<HubRequest>(json!({"type": "rooms.explode"}));
    assert!(result.is_err());
}

#[test]
fn typed_call_binds_response() {
    fn kind_of<C: HubCall>(_: &C) -> RequestKind {
        C::KIND
    }
    let search = SearchPluginsRequest { text: "hue".into() };
    assert_eq!(kind_of(&search), RequestKind::PluginsSearch);
    assert_eq!(response_for(RequestKind::PluginsSearch).fields, &["plugins"]);
}

#[test]
fn parameter_error_carries_nested_path() {
    let env: Envelope = serde_json::from_value(json!({
        "type": "error",
        "error": {"code": 400, "message": "INVALID_PARAMETER", "paramName": "device.config.brightness"}
    }))
    .unwrap();

    let err = env.into_result().unwrap_err();
    let path = err.kind.parameter().unwrap();
    assert_eq!(path.parameter(), "device");
    assert_eq!(
        path.segments().last(),
        Some(&PathSegment::Key("brightness".into()))
    );
    assert!(error_set_for(RequestKind::DevicesAddDevice).contains(&err));
}

#[test]
fn array_index_paths_roundtrip_on_the_wire() {
    let path = ParameterPath::root("ids").index(2);
    let err = HubError::new(ErrorKind::ParameterOutOfRange { param_name: path });
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(
        json,
        json!({"code": 400, "message": "PARAMETER_OUT_OF_RANGE", "paramName": "ids.2"})
    );
}

#[test]
fn not_found_objects_are_exact() {
    let errors = error_set_for(RequestKind::DevicesGetDevices);
    assert!(errors.contains(&HubError::not_found(ObjectKind::Room)));
    assert!(!errors.contains(&HubError::not_found(ObjectKind::Plugin)));
}

#[test]
fn typed_success_decoding() {
    let env: Envelope = serde_json::from_value(json!({
        "type": "ok",
        "data": {"devices": {"lamp": {"id": "lamp", "name": "Lamp", "icon": "lightbulb", "type": "hue.light", "config": {}}}}
    }))
    .unwrap();
    let typed: Envelope<DevicesResponse> = env.narrow().unwrap();
    let devices = typed.into_result().unwrap().devices;
    assert_eq!(devices["lamp"].device_type, "hue.light");

    let token: Envelope<TokenResponse> =
        serde_json::from_value(json!({"type": "ok", "data": {"token": "t"}})).unwrap();
    assert!(token.is_ok());
}

#[test]
fn every_kind_has_generic_errors() {
    for kind in RequestKind::ALL {
        let codes = error_set_for(*kind).codes();
        for code in [
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidRequestJson,
            ErrorCode::InvalidRequestType,
            ErrorCode::InternalServerError,
            ErrorCode::TooManyRequests,
        ] {
            assert!(codes.contains(&code), "{} lacks {}", kind, code);
        }
    }
}

#[test]
fn error_with_extra_fields_is_tolerated() {
    let err: HubError = serde_json::from_value(json!({
        "code": 404,
        "message": "NOT_FOUND",
        "object": "routine",
        "hint": "deleted yesterday"
    }))
    .unwrap();
    assert_eq!(err.kind, ErrorKind::NotFound { object: ObjectKind::Routine });
    let _: Value = serde_json::to_value(&err).unwrap();
}
