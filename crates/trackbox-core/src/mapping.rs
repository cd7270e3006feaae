// Upstream record -> Container view model mapping
//
// The gateway reports whatever a terminal happened to send; this module
// flattens that into the stable shape the rest of the app renders.
// Labels are Polish because that is what the app displays.

use chrono::{DateTime, Utc};
use trackbox_api::GatewayContainer;

use crate::models::{Checkpoint, Container, ContainerKind};

/// Shown wherever an informational field has no upstream value
pub const NOT_AVAILABLE: &str = "N/A";
/// Status label for containers the gateway knows nothing about
pub const STATUS_UNKNOWN: &str = "Nieznany";

/// Port code that marks a container as an import.
/// Single hard-coded equality check, preserved as-is; upstream
/// semantics for multi-port flows are undocumented.
const IMPORT_PORT_CODE: &str = "PLGDN";

const MONTHS_PL: [&str; 12] = [
    "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
];

const CHECKPOINT_ARRIVAL: &str = "Przybycie do terminala";
const CHECKPOINT_LOADING: &str = "Załadunek";
const CHECKPOINT_SEA_TRANSPORT: &str = "Transport morski";
const CHECKPOINT_DELIVERY: &str = "Dostarczenie";

/// Translate an upstream status code into the Polish display label.
/// Unknown codes pass through verbatim; a missing status is "Nieznany".
pub fn translate_status(status: Option<&str>) -> String {
    match status {
        None => STATUS_UNKNOWN.to_string(),
        Some("DELIVERED") => "Odprawa zakończona".to_string(),
        Some("LOADED") => "W tranzycie".to_string(),
        Some("DISCHARGED") => "Rozładunek".to_string(),
        Some("CUSTOMS_CLEARANCE") => "Odprawa celna".to_string(),
        Some("WAITING_FOR_PICKUP") => "Oczekiwanie na odbiór".to_string(),
        Some("LOADING") => "Załadunek".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Progress percentage for a status code
pub fn progress_for_status(status: Option<&str>) -> u8 {
    match status {
        None => 0,
        Some("DELIVERED") => 100,
        Some("LOADED") => 65,
        Some("DISCHARGED") => 80,
        Some(_) => 50,
    }
}

/// Import when the port code is the Gdansk import code, Export otherwise
pub fn kind_for_port(port_code: Option<&str>) -> ContainerKind {
    if port_code == Some(IMPORT_PORT_CODE) {
        ContainerKind::Import
    } else {
        ContainerKind::Export
    }
}

/// Parse an upstream ISO-8601 timestamp. Anything unparseable is None.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp as "D mon YYYY" with Polish month abbreviations
pub fn format_event_date(raw: Option<&str>) -> Option<String> {
    use chrono::Datelike;

    let date = parse_timestamp(raw)?;
    let month = MONTHS_PL[date.month0() as usize];
    Some(format!("{} {} {}", date.day(), month, date.year()))
}

/// Relative-time label for the most recent known event
pub fn time_ago(event: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(event) = event else {
        return NOT_AVAILABLE.to_string();
    };

    let hours = (now - event).num_hours().max(0);
    if hours < 1 {
        "przed chwilą".to_string()
    } else if hours == 1 {
        "1 godz. temu".to_string()
    } else if hours < 24 {
        format!("{} godz. temu", hours)
    } else {
        let days = hours / 24;
        if days == 1 {
            "1 dzień temu".to_string()
        } else {
            format!("{} dni temu", days)
        }
    }
}

/// Map one upstream record into the view model.
///
/// `now` is passed in so the relative-time label is computed once at
/// fetch time and stays testable.
pub fn map_record(record: &GatewayContainer, now: DateTime<Utc>) -> Container {
    let status = record.status.as_deref();

    // Most recent known event: loading time, else gate-in time
    let last_event = parse_timestamp(record.loading_time.as_deref())
        .or_else(|| parse_timestamp(record.gate_in_time.as_deref()));

    let id = record
        .container_number
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Container {
        id,
        number: record
            .container_number
            .clone()
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        mrn: record
            .customs_office_number
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        status: translate_status(status),
        progress: progress_for_status(status),
        terminal: record
            .terminal_name
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        arrival: format_event_date(record.departure_time())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        kind: kind_for_port(record.port_code.as_deref()),
        time_ago: time_ago(last_event, now),
        carrier: record
            .carrier_name()
            .map(str::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        history: vec![
            Checkpoint {
                title: CHECKPOINT_ARRIVAL.to_string(),
                date: format_event_date(record.gate_in_time.as_deref()),
                completed: record.gate_in_time.is_some(),
            },
            Checkpoint {
                title: CHECKPOINT_LOADING.to_string(),
                date: format_event_date(record.loading_time.as_deref()),
                completed: record.loading_time.is_some(),
            },
            Checkpoint {
                title: CHECKPOINT_SEA_TRANSPORT.to_string(),
                date: format_event_date(record.departure_time()),
                completed: matches!(status, Some("LOADED") | Some("DISCHARGED")),
            },
            Checkpoint {
                title: CHECKPOINT_DELIVERY.to_string(),
                date: None,
                completed: status == Some("DELIVERED"),
            },
        ],
    }
}

/// Synthesize the "unknown container" record shown when the gateway
/// returned nothing or failed. Every informational field is N/A and no
/// checkpoint is completed.
pub fn placeholder(query: &str) -> Container {
    let id = if query.trim().is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        query.to_string()
    };

    Container {
        number: id.clone(),
        id,
        mrn: NOT_AVAILABLE.to_string(),
        status: STATUS_UNKNOWN.to_string(),
        progress: 0,
        terminal: NOT_AVAILABLE.to_string(),
        arrival: NOT_AVAILABLE.to_string(),
        kind: ContainerKind::Export,
        time_ago: NOT_AVAILABLE.to_string(),
        carrier: NOT_AVAILABLE.to_string(),
        history: [
            CHECKPOINT_ARRIVAL,
            CHECKPOINT_LOADING,
            CHECKPOINT_SEA_TRANSPORT,
            CHECKPOINT_DELIVERY,
        ]
        .iter()
        .map(|title| Checkpoint {
            title: title.to_string(),
            date: None,
            completed: false,
        })
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(json: &str) -> GatewayContainer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_translation_table() {
        assert_eq!(translate_status(Some("DELIVERED")), "Odprawa zakończona");
        assert_eq!(translate_status(Some("LOADED")), "W tranzycie");
        assert_eq!(translate_status(Some("DISCHARGED")), "Rozładunek");
        assert_eq!(translate_status(Some("CUSTOMS_CLEARANCE")), "Odprawa celna");
        assert_eq!(
            translate_status(Some("WAITING_FOR_PICKUP")),
            "Oczekiwanie na odbiór"
        );
        assert_eq!(translate_status(Some("LOADING")), "Załadunek");
    }

    #[test]
    fn test_unknown_status_passes_through() {
        assert_eq!(translate_status(Some("ON_RAIL")), "ON_RAIL");
    }

    #[test]
    fn test_missing_status_is_unknown() {
        assert_eq!(translate_status(None), "Nieznany");
    }

    #[test]
    fn test_progress_table() {
        assert_eq!(progress_for_status(Some("DELIVERED")), 100);
        assert_eq!(progress_for_status(Some("LOADED")), 65);
        assert_eq!(progress_for_status(Some("DISCHARGED")), 80);
        assert_eq!(progress_for_status(Some("CUSTOMS_CLEARANCE")), 50);
        assert_eq!(progress_for_status(Some("ON_RAIL")), 50);
        assert_eq!(progress_for_status(None), 0);
    }

    #[test]
    fn test_kind_for_port() {
        assert_eq!(kind_for_port(Some("PLGDN")), ContainerKind::Import);
        assert_eq!(kind_for_port(Some("DEHAM")), ContainerKind::Export);
        assert_eq!(kind_for_port(None), ContainerKind::Export);
    }

    #[test]
    fn test_polish_date_formatting() {
        assert_eq!(
            format_event_date(Some("2025-03-06T04:01:00Z")),
            Some("6 mar 2025".to_string())
        );
        assert_eq!(
            format_event_date(Some("2024-10-21T12:00:00Z")),
            Some("21 paź 2024".to_string())
        );
        assert_eq!(format_event_date(Some("not-a-date")), None);
        assert_eq!(format_event_date(None), None);
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();

        let at = |h: i64| Some(now - chrono::Duration::hours(h));
        assert_eq!(time_ago(at(0), now), "przed chwilą");
        assert_eq!(time_ago(at(1), now), "1 godz. temu");
        assert_eq!(time_ago(at(5), now), "5 godz. temu");
        assert_eq!(time_ago(at(23), now), "23 godz. temu");
        assert_eq!(time_ago(at(24), now), "1 dzień temu");
        assert_eq!(time_ago(at(24 * 3), now), "3 dni temu");
        assert_eq!(time_ago(None, now), "N/A");
    }

    #[test]
    fn test_map_full_record() {
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 30, 0).unwrap();
        let container = map_record(
            &record(
                r#"{
                    "containerNumber": "TCKU7486791",
                    "customsOfficeNumber": "PL322080",
                    "status": "LOADED",
                    "terminalName": "DCT Gdansk",
                    "gateInTime": "2025-03-06T04:01:00Z",
                    "loadingTime": "2025-03-12T10:30:00Z",
                    "portCode": "PLGDN",
                    "atd": "2025-03-12T14:00:00Z",
                    "shipName": "Munkebo Maersk"
                }"#,
            ),
            now,
        );

        assert_eq!(container.id, "TCKU7486791");
        assert_eq!(container.number, "TCKU7486791");
        assert_eq!(container.mrn, "PL322080");
        assert_eq!(container.status, "W tranzycie");
        assert_eq!(container.progress, 65);
        assert_eq!(container.terminal, "DCT Gdansk");
        assert_eq!(container.arrival, "12 mar 2025");
        assert_eq!(container.kind, ContainerKind::Import);
        assert_eq!(container.time_ago, "6 godz. temu");
        assert_eq!(container.carrier, "Munkebo Maersk");

        assert_eq!(container.history.len(), 4);
        assert!(container.history[0].completed);
        assert_eq!(container.history[0].date.as_deref(), Some("6 mar 2025"));
        assert!(container.history[1].completed);
        assert!(container.history[2].completed);
        assert!(!container.history[3].completed);
    }

    #[test]
    fn test_map_sparse_record() {
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 30, 0).unwrap();
        let container = map_record(&record("{}"), now);

        assert_eq!(container.number, "UNKNOWN");
        assert!(!container.id.is_empty());
        assert_eq!(container.mrn, "N/A");
        assert_eq!(container.status, "Nieznany");
        assert_eq!(container.progress, 0);
        assert_eq!(container.terminal, "N/A");
        assert_eq!(container.arrival, "N/A");
        assert_eq!(container.kind, ContainerKind::Export);
        assert_eq!(container.time_ago, "N/A");
        assert_eq!(container.carrier, "N/A");
        assert_eq!(container.history.len(), 4);
        assert!(container.history.iter().all(|c| !c.completed));
    }

    #[test]
    fn test_delivered_completes_final_checkpoint() {
        let now = Utc::now();
        let container = map_record(&record(r#"{"status": "DELIVERED"}"#), now);
        assert_eq!(container.progress, 100);
        assert!(container.history[3].completed);
        assert!(!container.history[2].completed);
    }

    #[test]
    fn test_time_ago_falls_back_to_gate_in() {
        let now = Utc.with_ymd_and_hms(2025, 3, 8, 4, 1, 0).unwrap();
        let container = map_record(&record(r#"{"gateInTime": "2025-03-06T04:01:00Z"}"#), now);
        assert_eq!(container.time_ago, "2 dni temu");
    }

    #[test]
    fn test_placeholder_shape() {
        let container = placeholder("TCKU7486791");

        assert_eq!(container.id, "TCKU7486791");
        assert_eq!(container.number, "TCKU7486791");
        assert_eq!(container.status, "Nieznany");
        assert_eq!(container.progress, 0);
        assert_eq!(container.mrn, "N/A");
        assert_eq!(container.kind, ContainerKind::Export);
        assert_eq!(container.history.len(), 4);
        assert!(container.history.iter().all(|c| !c.completed));
        assert!(container.history.iter().all(|c| c.date.is_none()));
    }

    #[test]
    fn test_placeholder_with_blank_query_gets_generated_id() {
        let container = placeholder("   ");
        assert!(!container.id.trim().is_empty());
        assert_ne!(container.id, "   ");
    }
}
