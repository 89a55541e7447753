//! Integration tests: full page snapshots through the engine.

use chatdom::chats::list_chats;
use chatdom::config::{EngineConfig, Markers};
use chatdom::engine::{Engine, ScrapeRequest, scrape};
use chatdom::export::to_txt;
use chatdom::format::{ExportFormat, write_to_format};
use chatdom::{ContentKind, NormalizedMessage};
use chrono::NaiveDate;

const SNAPSHOT: &str = include_str!("fixtures/snapshot.html");

const EXPECTED_TXT: &str = "\
02/14/2024, 10:00 AM - Alice Smith: Hi! 😀 ready?
02/14/2024, 10:05 AM - Me: Yes
02/14/2024, 10:07 AM - Alice Smith: Great
02/14/2024, 10:10 AM - Alice Smith: <Media omitted> Look
02/15/2024, 09:15 AM - Alice Smith: <Media omitted>
02/15/2024, 09:20 AM - Me: <You deleted this message>
02/15/2024, 09:30 AM - Bob 🎉: <Media omitted>
02/15/2024, 09:30 AM - Bob 🎉: <Media omitted>
";

fn page(rows: &str) -> String {
    format!(
        r#"<html><body><div id="main"><div role="application">{rows}</div></div></body></html>"#
    )
}

fn text_row(id: &str, side: &str, provenance: &str, body: &str) -> String {
    format!(
        r#"<div role="row"><div class="{side}" data-id="{id}">
             <div class="copyable-text" data-pre-plain-text="{provenance}">
               <span class="selectable-text"><span>{body}</span></span>
             </div></div></div>"#
    )
}

fn kinds(messages: &[NormalizedMessage]) -> Vec<ContentKind> {
    messages.iter().map(|m| m.content_kind).collect()
}

mod snapshot {
    use super::*;

    #[test]
    fn test_rows_match_client_export_layout() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        assert_eq!(to_txt(&scrape.log.rows()), EXPECTED_TXT);
    }

    #[test]
    fn test_grouped_by_date() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        assert_eq!(scrape.log.dates(), vec!["02/14/2024", "02/15/2024"]);
        assert_eq!(scrape.log.groups()[0].entries.len(), 4);
        assert_eq!(scrape.log.groups()[1].entries.len(), 4);
    }

    #[test]
    fn test_content_kinds() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        assert_eq!(
            kinds(&scrape.messages),
            vec![
                ContentKind::PlainText,
                ContentKind::PlainText,
                ContentKind::PlainText,
                ContentKind::TextWithMediaNotice,
                ContentKind::MediaOnly,
                ContentKind::Deleted,
                ContentKind::MediaOnly,
                ContentKind::MediaOnly,
            ]
        );
    }

    #[test]
    fn test_self_identity_and_flags() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        assert_eq!(scrape.report.self_identity, "Me");
        let own: Vec<&str> = scrape
            .messages
            .iter()
            .filter(|m| m.is_self)
            .map(|m| m.body.as_str())
            .collect();
        assert_eq!(own, vec!["Yes", "<You deleted this message>"]);
    }

    #[test]
    fn test_report() {
        let scrape = Engine::new()
            .scrape(&ScrapeRequest::new(SNAPSHOT).with_target(7))
            .unwrap();
        let report = &scrape.report;
        assert_eq!(report.fragments, 7);
        assert_eq!(report.records, 8);
        assert_eq!(report.paired, 1);
        assert_eq!(report.unresolved_senders, 0);
        assert_eq!(report.unresolved_timestamps, 0);
        assert!(report.dropped.is_empty());
        assert!(!report.count_mismatch());
        assert!(report.target_reached());
    }

    #[test]
    fn test_ids_are_unique() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        let mut ids: Vec<&str> = scrape.messages.iter().map(|m| m.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert!(ids.contains(&"false_group@g.us_C7#2"));
    }

    #[test]
    fn test_list_chats() {
        assert_eq!(
            list_chats(SNAPSHOT, &Markers::default()).unwrap(),
            vec!["Alice Smith", "Book Club 📚", "+1 555 0100"]
        );
    }

    #[test]
    fn test_every_format_writes() {
        let scrape = Engine::new().scrape(&ScrapeRequest::new(SNAPSHOT)).unwrap();
        let rows = scrape.log.rows();
        let dir = tempfile::tempdir().unwrap();
        for format in ExportFormat::all() {
            let path = dir.path().join(format!("chat.{}", format.extension()));
            write_to_format(&rows, &path, *format).unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.contains("Alice Smith"), "{format}");
            assert!(content.contains("Bob 🎉"), "{format}");
        }
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_login_page_is_structural_mismatch() {
        let login = r#"<html><body><canvas aria-label="Scan me!"></canvas></body></html>"#;
        let err = scrape(&ScrapeRequest::new(login), &EngineConfig::default()).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("message list container"));
    }

    #[test]
    fn test_unsupported_locale_aborts() {
        let html = page(&text_row("a", "message-in", "[14:35, 15.2.2024] Alice: ", "Hallo"));
        let err = scrape(&ScrapeRequest::new(&html), &EngineConfig::default()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("14:35, 15.2.2024"));
    }

    #[test]
    fn test_empty_message_list() {
        let html = page("");
        let scrape = scrape(&ScrapeRequest::new(&html), &EngineConfig::default()).unwrap();
        assert!(scrape.log.is_empty());
        assert_eq!(scrape.report.fragments, 0);
        assert_eq!(scrape.report.self_identity, "You");
    }
}

mod configuration {
    use super::*;

    #[test]
    fn test_markers_from_json() {
        let config = EngineConfig::from_json_str(
            r#"{
                "self_fallback": "Owner",
                "markers": {
                    "containers": [{"attribute": "id", "equals": "history"}],
                    "incoming_class": "bubble-left",
                    "outgoing_class": "bubble-right",
                    "message_class_hint": "bubble"
                }
            }"#,
        )
        .unwrap();
        let html = r#"<html><body><section id="history">
            <div class="bubble-left" data-id="1">
              <div class="copyable-text" data-pre-plain-text="[2/15/2024, 9:00 AM] Carol: ">
                <span class="selectable-text">hello</span>
              </div>
            </div>
            <div class="bubble-right" data-id="2">
              <div data-testid="recalled-msg"><span>9:01 AM</span></div>
            </div>
        </section></body></html>"#;

        let scrape = scrape(&ScrapeRequest::new(html), &config).unwrap();
        let rows = scrape.log.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sender, "Carol");
        assert_eq!(rows[1].sender, "Owner");
        assert_eq!(rows[1].time, "09:01 AM");
    }

    #[test]
    fn test_relative_separators_with_reference_date() {
        let rows = format!(
            r#"<div><span>Yesterday</span></div>
               {}
               <div><span>Today</span></div>
               <div role="row"><div class="message-out" data-id="d">
                 <div data-testid="recalled-msg"><span>8:00 AM</span></div>
               </div></div>"#,
            text_row("a", "message-in", "[2/15/2024, 11:00 PM] Bob: ", "night")
        );
        let html = page(&rows);
        let config = EngineConfig::new()
            .with_self_fallback("Me")
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
        let scrape = scrape(&ScrapeRequest::new(&html), &config).unwrap();
        assert_eq!(scrape.log.dates(), vec!["02/15/2024", "02/16/2024"]);
        assert_eq!(scrape.messages[1].sender, "Me");
    }

    #[test]
    fn test_relative_separator_without_reference_uses_carried_date() {
        let rows = format!(
            r#"{}
               <div><span>Today</span></div>
               <div role="row"><div class="message-out" data-id="d">
                 <div data-testid="recalled-msg"><span>8:00 AM</span></div>
               </div></div>"#,
            text_row("a", "message-in", "[2/15/2024, 11:00 PM] Bob: ", "night")
        );
        let scrape = scrape(&ScrapeRequest::new(&page(&rows)), &EngineConfig::default()).unwrap();
        // known limitation: the day boundary is lost without a reference date
        assert_eq!(scrape.log.dates(), vec!["02/15/2024"]);
        assert_eq!(scrape.log.rows()[1].time, "08:00 AM");
    }

    #[test]
    fn test_contact_card_detection_toggle() {
        let html = page(&format!(
            r#"{}
               <div role="row"><div class="message-in" data-id="c">
                 <div class="copyable-text" data-pre-plain-text="[2/15/2024, 9:05 AM] Bob: ">
                   <span class="selectable-text">Dentist</span>
                   <div>
                     <div role="button">Message</div>
                     <div role="button">Add to a group</div>
                   </div>
                 </div>
               </div></div>"#,
            text_row("a", "message-in", "[2/15/2024, 9:00 AM] Bob: ", "here")
        ));

        let scrape_on = scrape(&ScrapeRequest::new(&html), &EngineConfig::default()).unwrap();
        assert_eq!(scrape_on.messages[1].body, "<Media omitted> Dentist");

        let mut markers = Markers::default();
        markers.detect_contact_cards = false;
        let config = EngineConfig::new().with_markers(markers);
        let scrape_off = scrape(&ScrapeRequest::new(&html), &config).unwrap();
        assert_eq!(scrape_off.messages[1].body, "Dentist");
    }
}
