use crate::events::AppEvent;
use async_channel::Sender;
use prometheus_geometry::Point;
use prometheus_geometry::pointer::PointerEvent;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Parses one line of a pointer script.
///
/// ```text
/// down 120 40
/// move 130.5 44
/// up 131 47
/// scroll -1
/// cancel
/// ```
pub fn parse_line(line: &str) -> Option<AppEvent> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?.to_ascii_lowercase();
    let mut number = || {
        parts
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|n| n.is_finite())
    };

    let event = match verb.as_str() {
        "down" | "move" | "up" => {
            let point = Point::new(number()?, number()?);
            let pointer = match verb.as_str() {
                "down" => PointerEvent::Down(point),
                "move" => PointerEvent::Move(point),
                _ => PointerEvent::Up(point),
            };
            AppEvent::Pointer(pointer)
        }
        "cancel" => AppEvent::Pointer(PointerEvent::Cancel),
        "scroll" => AppEvent::Scroll(number()?),
        "reload" => AppEvent::ConfigReload,
        _ => return None,
    };
    Some(event)
}

pub async fn run_reader<R>(reader: R, tx: Sender<AppEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match parse_line(line) {
                    Some(event) => {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    None => log::warn!("Ignoring unreadable input line: {}", line),
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = tx.send(AppEvent::InputClosed).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(line: &str) -> Option<PointerEvent> {
        match parse_line(line)? {
            AppEvent::Pointer(p) => Some(p),
            _ => None,
        }
    }

    #[test]
    fn test_parse_pointer_lines() {
        assert_eq!(
            pointer("down 10 20"),
            Some(PointerEvent::Down(Point::new(10.0, 20.0)))
        );
        assert_eq!(
            pointer("MOVE -3.5 4"),
            Some(PointerEvent::Move(Point::new(-3.5, 4.0)))
        );
        assert_eq!(pointer("up 1 2"), Some(PointerEvent::Up(Point::new(1.0, 2.0))));
        assert_eq!(pointer("cancel"), Some(PointerEvent::Cancel));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_line("down 10").is_none());
        assert!(parse_line("move x y").is_none());
        assert!(parse_line("jump 1 2").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("scroll NaN").is_none());
        assert!(parse_line("move inf 0").is_none());
    }

    #[test]
    fn test_parse_other_events() {
        assert!(matches!(parse_line("scroll -1"), Some(AppEvent::Scroll(d)) if d == -1.0));
        assert!(matches!(parse_line("reload"), Some(AppEvent::ConfigReload)));
    }

    #[tokio::test]
    async fn test_reader_forwards_and_closes() {
        let (tx, rx) = async_channel::unbounded();
        let script: &[u8] = b"down 0 -10\n# comment\n\nmove 10 0\nbogus\nup 10 0\n";
        run_reader(script, tx).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], AppEvent::Pointer(PointerEvent::Down(_))));
        assert!(matches!(events[3], AppEvent::InputClosed));
    }
}
