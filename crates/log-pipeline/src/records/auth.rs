//! 플레이어 인증 (화면 이름)
//!
//! 인증 세그먼트는 JSON 디코딩 대신 정규식 캡처로 화면 이름만 꺼냅니다.
//! 신규 클라이언트는 `"screenName"`, 구 클라이언트의 인증 요청은
//! `"PlayerName"` 필드를 사용합니다.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ArenaLogError;
use crate::segment::Segment;

static SCREEN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""screenName"\s*:\s*"([^"]*)"|"PlayerName"\s*:\s*"([^"]*)""#)
        .expect("screen name pattern is a valid regex")
});

/// 업로드용 인증 레코드 (`{"Payload":{"PlayerName":...}}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "Payload")]
    pub payload: AuthPayload,
}

/// 인증 요청 본문
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(rename = "PlayerName")]
    pub player_name: String,
}

impl AuthRequest {
    /// 화면 이름으로 인증 레코드를 생성합니다.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            payload: AuthPayload {
                player_name: player_name.into(),
            },
        }
    }

    /// 화면 이름
    pub fn player_name(&self) -> &str {
        &self.payload.player_name
    }
}

/// 인증 세그먼트에서 화면 이름을 추출합니다.
pub fn parse_auth(segment: &Segment) -> Result<String, ArenaLogError> {
    let name = SCREEN_NAME
        .captures(&segment.body)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .unwrap_or_default();

    if name.is_empty() {
        return Err(ArenaLogError::MalformedPayload {
            kind: segment.kind.as_str().to_owned(),
            line: segment.line(),
            reason: "no screen name".to_owned(),
        });
    }
    Ok(name.to_owned())
}
