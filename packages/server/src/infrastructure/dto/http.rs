//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Coordinator state exposed on `/debug/state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshotDto {
    pub connections: usize,
    pub authenticated: usize,
    pub waiting: WaitingDto,
    pub rooms: Vec<RoomSummaryDto>,
}

/// Waiting user ids per side, front of the queue first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingDto {
    #[serde(rename = "A")]
    pub a: Vec<u64>,
    #[serde(rename = "B")]
    pub b: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub session_id: u64,
    pub members: usize,
}
