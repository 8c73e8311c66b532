//! Enterprise security manager
//!
//! Rate limiting theo client (sliding window), đếm vi phạm và tự động chặn,
//! chặn/mở chặn thủ công, quét input tìm dấu hiệu tấn công.
//!
//! Toàn bộ state nằm sau một `Mutex`. Các hàm `*_at` nhận thời điểm `now`
//! để tests chạy không phụ thuộc đồng hồ.

use crate::error::BusinessResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{info, warn};

// ============================================================================
// Configuration
// ============================================================================

/// Cấu hình security manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Số request tối đa trong một cửa sổ
    pub max_requests: u32,
    pub window_secs: u64,
    /// Số vi phạm trước khi tự động chặn
    pub block_after_violations: u32,
    pub block_duration_secs: u64,
    /// Input dài hơn bị coi là vi phạm
    pub max_input_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 60,
            block_after_violations: 5,
            block_duration_secs: 3600,
            max_input_length: 10_000,
        }
    }
}

impl SecurityConfig {
    /// Defaults, ghi đè bởi biến môi trường `NVCBANK_RATE_LIMIT`,
    /// `NVCBANK_RATE_WINDOW_SECS`, `NVCBANK_BLOCK_AFTER`, `NVCBANK_BLOCK_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: env_or("NVCBANK_RATE_LIMIT", defaults.max_requests),
            window_secs: env_or("NVCBANK_RATE_WINDOW_SECS", defaults.window_secs),
            block_after_violations: env_or("NVCBANK_BLOCK_AFTER", defaults.block_after_violations),
            block_duration_secs: env_or("NVCBANK_BLOCK_SECS", defaults.block_duration_secs),
            max_input_length: env_or("NVCBANK_MAX_INPUT_LENGTH", defaults.max_input_length),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn block_duration(&self) -> Duration {
        Duration::from_secs(self.block_duration_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Threat scanning
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    SqlInjection,
    Xss,
    PathTraversal,
    OversizedInput,
}

impl ThreatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::SqlInjection => "sql_injection",
            ThreatKind::Xss => "xss",
            ThreatKind::PathTraversal => "path_traversal",
            ThreatKind::OversizedInput => "oversized_input",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bộ quét input theo regex
pub struct ThreatScanner {
    patterns: Vec<(ThreatKind, Regex)>,
    max_length: usize,
}

impl ThreatScanner {
    pub fn new(max_length: usize) -> Result<Self, regex::Error> {
        let specs: [(ThreatKind, &str); 6] = [
            (
                ThreatKind::SqlInjection,
                r"(?i)\b(union\s+(all\s+)?select|select\s+.+\s+from|insert\s+into|drop\s+table|delete\s+from|update\s+\w+\s+set)\b",
            ),
            (ThreatKind::SqlInjection, r#"(?i)('|")\s*(or|and)\s+('?\w+'?)\s*=\s*('?\w+'?)"#),
            (ThreatKind::SqlInjection, r"(--|/\*|\*/|;\s*(drop|shutdown|exec)\b)"),
            (
                ThreatKind::Xss,
                r"(?i)(<\s*script\b|javascript\s*:|\bon(error|load|click|mouseover)\s*=|<\s*iframe\b)",
            ),
            (ThreatKind::PathTraversal, r"(\.\./|\.\.\\)"),
            (ThreatKind::PathTraversal, r"(?i)(%2e%2e(%2f|%5c)|/etc/passwd|\bboot\.ini\b)"),
        ];

        let patterns = specs
            .iter()
            .map(|(kind, pattern)| Regex::new(pattern).map(|re| (*kind, re)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            max_length,
        })
    }

    /// Các loại threat tìm thấy, không trùng lặp
    pub fn scan(&self, input: &str) -> Vec<ThreatKind> {
        let mut found = Vec::new();
        if input.len() > self.max_length {
            found.push(ThreatKind::OversizedInput);
        }
        for (kind, re) in &self.patterns {
            if !found.contains(kind) && re.is_match(input) {
                found.push(*kind);
            }
        }
        found
    }
}

// ============================================================================
// Manager
// ============================================================================

/// Kết quả kiểm tra một request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityDecision {
    Allowed { remaining: u32 },
    RateLimited { retry_after: Duration },
    Blocked { reason: String, retry_after: Option<Duration> },
}

impl SecurityDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SecurityDecision::Allowed { .. })
    }
}

#[derive(Debug, Clone)]
struct BlockEntry {
    reason: String,
    /// None = chặn vĩnh viễn tới khi unblock
    expires_at: Option<Instant>,
}

impl BlockEntry {
    fn is_active(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[derive(Debug, Default)]
struct ClientState {
    requests: VecDeque<Instant>,
    violations: u32,
    last_seen: Option<Instant>,
}

#[derive(Debug, Default)]
struct SecurityState {
    clients: HashMap<String, ClientState>,
    blocked: HashMap<String, BlockEntry>,
    total_requests: u64,
    rate_limited: u64,
    threats_detected: u64,
    auto_blocks: u64,
}

/// Snapshot thống kê cho security center
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityStats {
    pub tracked_clients: usize,
    pub blocked_clients: usize,
    pub total_requests: u64,
    pub rate_limited: u64,
    pub threats_detected: u64,
    pub auto_blocks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedClient {
    pub client: String,
    pub reason: String,
    /// Số giây còn lại; None nếu không hết hạn
    pub expires_in_secs: Option<u64>,
}

pub struct EnterpriseSecurityManager {
    config: SecurityConfig,
    scanner: ThreatScanner,
    state: Mutex<SecurityState>,
}

impl EnterpriseSecurityManager {
    pub fn new(config: SecurityConfig) -> BusinessResult<Self> {
        let scanner = ThreatScanner::new(config.max_input_length)?;
        Ok(Self {
            config,
            scanner,
            state: Mutex::new(SecurityState::default()),
        })
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, SecurityState> {
        // State vẫn nhất quán khi một thread panic giữa chừng
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn check_request(&self, client: &str) -> SecurityDecision {
        self.check_request_at(client, Instant::now())
    }

    /// Ghi nhận một request và quyết định cho qua hay không
    pub fn check_request_at(&self, client: &str, now: Instant) -> SecurityDecision {
        let mut state = self.lock();
        state.total_requests += 1;

        if let Some(entry) = state.blocked.get(client) {
            if entry.is_active(now) {
                return SecurityDecision::Blocked {
                    reason: entry.reason.clone(),
                    retry_after: entry.expires_at.map(|at| at - now),
                };
            }
            state.blocked.remove(client);
        }

        let window = self.config.window();
        let limit = self.config.max_requests as usize;
        let client_state = state.clients.entry(client.to_string()).or_default();
        client_state.last_seen = Some(now);
        while let Some(&oldest) = client_state.requests.front() {
            if now.duration_since(oldest) >= window {
                client_state.requests.pop_front();
            } else {
                break;
            }
        }

        if client_state.requests.len() >= limit {
            let retry_after = client_state
                .requests
                .front()
                .map(|&oldest| window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(window);
            state.rate_limited += 1;
            drop(state);
            warn!(client, "rate limit exceeded");
            if let Some(decision) = self.violation_at(client, "rate limit exceeded", now) {
                return decision;
            }
            return SecurityDecision::RateLimited { retry_after };
        }

        client_state.requests.push_back(now);
        SecurityDecision::Allowed {
            remaining: (limit - client_state.requests.len()) as u32,
        }
    }

    /// Đếm vi phạm; trả về `Blocked` nếu lần này dẫn tới chặn tự động
    fn violation_at(&self, client: &str, reason: &str, now: Instant) -> Option<SecurityDecision> {
        let mut state = self.lock();
        let violations = {
            let client_state = state.clients.entry(client.to_string()).or_default();
            client_state.violations += 1;
            client_state.last_seen = Some(now);
            client_state.violations
        };

        if violations < self.config.block_after_violations {
            return None;
        }

        let duration = self.config.block_duration();
        let reason = format!("automatic block after {} violations: {}", violations, reason);
        state.blocked.insert(
            client.to_string(),
            BlockEntry {
                reason: reason.clone(),
                expires_at: now.checked_add(duration),
            },
        );
        state.auto_blocks += 1;
        if let Some(client_state) = state.clients.get_mut(client) {
            client_state.violations = 0;
        }
        warn!(client, violations, "client automatically blocked");
        Some(SecurityDecision::Blocked {
            reason,
            retry_after: Some(duration),
        })
    }

    pub fn record_violation(&self, client: &str, reason: &str) -> bool {
        self.record_violation_at(client, reason, Instant::now())
    }

    /// Ghi nhận vi phạm; true nếu client bị chặn sau lần này
    pub fn record_violation_at(&self, client: &str, reason: &str, now: Instant) -> bool {
        self.violation_at(client, reason, now).is_some()
    }

    pub fn violations(&self, client: &str) -> u32 {
        self.lock()
            .clients
            .get(client)
            .map_or(0, |c| c.violations)
    }

    pub fn block(&self, client: &str, duration: Option<Duration>, reason: &str) {
        self.block_at(client, duration, reason, Instant::now())
    }

    /// Chặn client; `None` hoặc thời hạn vượt quá mốc Instant biểu diễn được là chặn vĩnh viễn
    pub fn block_at(&self, client: &str, duration: Option<Duration>, reason: &str, now: Instant) {
        let mut state = self.lock();
        state.blocked.insert(
            client.to_string(),
            BlockEntry {
                reason: reason.to_string(),
                expires_at: duration.and_then(|d| now.checked_add(d)),
            },
        );
        info!(client, reason, ?duration, "client blocked");
    }

    /// Mở chặn và xóa bộ đếm vi phạm; false nếu client không bị chặn
    pub fn unblock(&self, client: &str) -> bool {
        let mut state = self.lock();
        if let Some(c) = state.clients.get_mut(client) {
            c.violations = 0;
        }
        let removed = state.blocked.remove(client).is_some();
        if removed {
            info!(client, "client unblocked");
        }
        removed
    }

    pub fn is_blocked(&self, client: &str) -> bool {
        self.is_blocked_at(client, Instant::now())
    }

    pub fn is_blocked_at(&self, client: &str, now: Instant) -> bool {
        self.lock()
            .blocked
            .get(client)
            .map_or(false, |e| e.is_active(now))
    }

    pub fn blocked_clients_at(&self, now: Instant) -> Vec<BlockedClient> {
        let state = self.lock();
        let mut list: Vec<BlockedClient> = state
            .blocked
            .iter()
            .filter(|(_, e)| e.is_active(now))
            .map(|(client, e)| BlockedClient {
                client: client.clone(),
                reason: e.reason.clone(),
                expires_in_secs: e.expires_at.map(|at| (at - now).as_secs()),
            })
            .collect();
        list.sort_by(|a, b| a.client.cmp(&b.client));
        list
    }

    pub fn blocked_clients(&self) -> Vec<BlockedClient> {
        self.blocked_clients_at(Instant::now())
    }

    /// Xóa block hết hạn và client không hoạt động.
    /// Client sạch bị xóa sau một cửa sổ; client còn vi phạm được giữ
    /// tới khi im lặng quá `block_duration` (trừ khi đang bị chặn).
    /// Trả về số mục đã xóa.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let window = self.config.window();
        let violation_ttl = self.config.block_duration();
        let mut state = self.lock();
        let blocks_before = state.blocked.len();
        state.blocked.retain(|_, e| e.is_active(now));

        let clients_before = state.clients.len();
        let SecurityState { clients, blocked, .. } = &mut *state;
        clients.retain(|client, c| {
            if blocked.contains_key(client) {
                return true;
            }
            let idle = c
                .last_seen
                .map_or(Duration::MAX, |seen| now.saturating_duration_since(seen));
            if c.violations > 0 {
                idle < violation_ttl
            } else {
                idle < window
            }
        });

        (blocks_before - state.blocked.len()) + (clients_before - state.clients.len())
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Quét input; threat tìm thấy được tính là vi phạm của client
    pub fn inspect_input_at(&self, client: &str, input: &str, now: Instant) -> Vec<ThreatKind> {
        let threats = self.scanner.scan(input);
        if !threats.is_empty() {
            self.lock().threats_detected += 1;
            let kinds: Vec<&str> = threats.iter().map(|t| t.as_str()).collect();
            warn!(client, threats = ?kinds, "malicious input detected");
            self.violation_at(client, &format!("threat detected: {}", kinds.join(",")), now);
        }
        threats
    }

    pub fn inspect_input(&self, client: &str, input: &str) -> Vec<ThreatKind> {
        self.inspect_input_at(client, input, Instant::now())
    }

    /// Quét input, không ghi nhận vi phạm
    pub fn scan_input(&self, input: &str) -> Vec<ThreatKind> {
        self.scanner.scan(input)
    }

    pub fn stats_at(&self, now: Instant) -> SecurityStats {
        let state = self.lock();
        SecurityStats {
            tracked_clients: state.clients.len(),
            blocked_clients: state.blocked.values().filter(|e| e.is_active(now)).count(),
            total_requests: state.total_requests,
            rate_limited: state.rate_limited,
            threats_detected: state.threats_detected,
            auto_blocks: state.auto_blocks,
        }
    }

    pub fn stats(&self) -> SecurityStats {
        self.stats_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(max_requests: u32, block_after: u32) -> EnterpriseSecurityManager {
        EnterpriseSecurityManager::new(SecurityConfig {
            max_requests,
            window_secs: 60,
            block_after_violations: block_after,
            block_duration_secs: 600,
            max_input_length: 64,
        })
        .unwrap()
    }

    #[test]
    fn test_sliding_window() {
        let mgr = manager(3, 10);
        let t0 = Instant::now();

        for i in 0..3 {
            let decision = mgr.check_request_at("10.0.0.1", t0 + Duration::from_secs(i));
            assert_eq!(decision, SecurityDecision::Allowed { remaining: 2 - i as u32 });
        }

        let limited = mgr.check_request_at("10.0.0.1", t0 + Duration::from_secs(10));
        assert_eq!(
            limited,
            SecurityDecision::RateLimited {
                retry_after: Duration::from_secs(50)
            }
        );

        // Client khác không bị ảnh hưởng
        assert!(mgr.check_request_at("10.0.0.2", t0).is_allowed());

        // Request đầu tiên rời cửa sổ
        assert!(mgr
            .check_request_at("10.0.0.1", t0 + Duration::from_secs(60))
            .is_allowed());
        assert_eq!(mgr.stats_at(t0).rate_limited, 1);
    }

    #[test]
    fn test_repeated_limits_trigger_block() {
        let mgr = manager(1, 3);
        let t0 = Instant::now();
        assert!(mgr.check_request_at("c", t0).is_allowed());

        assert!(matches!(
            mgr.check_request_at("c", t0),
            SecurityDecision::RateLimited { .. }
        ));
        assert!(matches!(
            mgr.check_request_at("c", t0),
            SecurityDecision::RateLimited { .. }
        ));
        assert!(matches!(
            mgr.check_request_at("c", t0),
            SecurityDecision::Blocked { .. }
        ));
        assert!(mgr.is_blocked_at("c", t0));
        assert_eq!(mgr.stats_at(t0).auto_blocks, 1);

        // Hết hạn chặn
        let later = t0 + Duration::from_secs(601);
        assert!(!mgr.is_blocked_at("c", later));
        assert!(mgr.check_request_at("c", later).is_allowed());
    }

    #[test]
    fn test_manual_block_and_unblock() {
        let mgr = manager(10, 10);
        let t0 = Instant::now();

        mgr.block_at("bad", None, "manual", t0);
        match mgr.check_request_at("bad", t0 + Duration::from_secs(86_400)) {
            SecurityDecision::Blocked { reason, retry_after } => {
                assert_eq!(reason, "manual");
                assert_eq!(retry_after, None);
            }
            other => panic!("unexpected {:?}", other),
        }

        mgr.block_at("temp", Some(Duration::from_secs(30)), "cool down", t0);
        let list = mgr.blocked_clients_at(t0 + Duration::from_secs(10));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].client, "temp");
        assert_eq!(list[1].expires_in_secs, Some(20));

        assert!(mgr.unblock("bad"));
        assert!(!mgr.unblock("bad"));
        assert!(!mgr.is_blocked_at("bad", t0));
    }

    #[test]
    fn test_violations_and_unblock_reset() {
        let mgr = manager(10, 2);
        let t0 = Instant::now();
        assert!(!mgr.record_violation_at("x", "path scan", t0));
        assert_eq!(mgr.violations("x"), 1);
        assert!(mgr.record_violation_at("x", "path scan", t0));
        assert!(mgr.is_blocked_at("x", t0));
        assert!(mgr.unblock("x"));
        assert_eq!(mgr.violations("x"), 0);
    }

    #[test]
    fn test_purge() {
        let mgr = manager(10, 10);
        let t0 = Instant::now();
        mgr.check_request_at("idle", t0);
        mgr.block_at("short", Some(Duration::from_secs(5)), "x", t0);
        mgr.block_at("forever", None, "x", t0);

        let purged = mgr.purge_expired_at(t0 + Duration::from_secs(120));
        assert_eq!(purged, 2);
        let stats = mgr.stats_at(t0 + Duration::from_secs(120));
        assert_eq!(stats.tracked_clients, 0);
        assert_eq!(stats.blocked_clients, 1);
    }

    #[test]
    fn test_purge_idle_violators() {
        let mgr = manager(10, 10);
        let t0 = Instant::now();
        mgr.record_violation_at("noisy", "bad input", t0);
        mgr.record_violation_at("jailed", "bad input", t0);
        mgr.block_at("jailed", None, "manual", t0);

        // còn trong block_duration: vi phạm được giữ lại
        mgr.purge_expired_at(t0 + Duration::from_secs(300));
        assert_eq!(mgr.violations("noisy"), 1);

        let purged = mgr.purge_expired_at(t0 + Duration::from_secs(601));
        assert_eq!(purged, 1);
        assert_eq!(mgr.violations("noisy"), 0);
        // client đang bị chặn giữ nguyên bộ đếm
        assert_eq!(mgr.violations("jailed"), 1);
    }

    #[test]
    fn test_block_with_unrepresentable_duration_is_permanent() {
        let mgr = manager(10, 10);
        let t0 = Instant::now();
        mgr.block_at("far", Some(Duration::from_secs(u64::MAX)), "manual", t0);

        assert!(mgr.is_blocked_at("far", t0 + Duration::from_secs(86_400 * 365)));
        let list = mgr.blocked_clients_at(t0);
        assert_eq!(list[0].expires_in_secs, None);
        // manager vẫn dùng được sau đó
        assert!(mgr.check_request_at("other", t0).is_allowed());
    }

    #[test]
    fn test_threat_scanning() {
        let mgr = manager(10, 10);
        assert_eq!(mgr.scan_input("name=alice&page=2"), vec![]);
        assert_eq!(
            mgr.scan_input("id=1' OR '1'='1"),
            vec![ThreatKind::SqlInjection]
        );
        assert_eq!(
            mgr.scan_input("q=1 UNION SELECT password FROM users"),
            vec![ThreatKind::SqlInjection]
        );
        assert_eq!(
            mgr.scan_input("<script>alert(1)</script>"),
            vec![ThreatKind::Xss]
        );
        assert_eq!(mgr.scan_input("file=../../etc/passwd"), vec![ThreatKind::PathTraversal]);
        assert_eq!(mgr.scan_input(&"a".repeat(65)), vec![ThreatKind::OversizedInput]);
    }

    #[test]
    fn test_inspect_counts_violation() {
        let mgr = manager(10, 1);
        let t0 = Instant::now();
        let threats = mgr.inspect_input_at("evil", "<img onerror=alert(1)>", t0);
        assert_eq!(threats, vec![ThreatKind::Xss]);
        assert!(mgr.is_blocked_at("evil", t0));
        assert_eq!(mgr.stats_at(t0).threats_detected, 1);
        assert!(mgr.inspect_input_at("good", "hello", t0).is_empty());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: SecurityConfig = serde_json::from_str(r#"{"max_requests": 5}"#).unwrap();
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.window_secs, 60);
        assert_eq!(config.block_after_violations, 5);
    }
}
