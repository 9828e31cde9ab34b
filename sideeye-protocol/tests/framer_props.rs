//! Property tests for the line framer.

use proptest::prelude::*;
use sideeye_protocol::{HostCommand, LineFramer, MAX_LINE_LEN};

fn body_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("not a terminator", |b| *b != b'\n' && *b != b'\r')
}

proptest! {
    /// No line ever exceeds the cap, whatever the input.
    #[test]
    fn prop_lines_never_exceed_cap(bytes in prop::collection::vec(any::<u8>(), 0..4096)) {
        let mut framer = LineFramer::new();
        framer.feed_bytes(&bytes, |line| {
            assert!(line.as_bytes().len() <= MAX_LINE_LEN);
            assert!(!line.as_bytes().is_empty());
        });
    }

    /// An overlong line is reported truncated and the following line is intact.
    #[test]
    fn prop_overlong_line_does_not_corrupt_next(
        junk in prop::collection::vec(body_byte(), (MAX_LINE_LEN + 1)..2048),
        body in prop::collection::vec(body_byte(), 1..MAX_LINE_LEN),
    ) {
        let mut input = junk.clone();
        input.push(b'\n');
        input.extend_from_slice(&body);
        input.push(b'\r');

        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        framer.feed_bytes(&input, |line| lines.push(line));

        prop_assert_eq!(lines.len(), 2);
        prop_assert!(lines[0].is_truncated());
        prop_assert_eq!(lines[0].as_bytes(), &junk[..MAX_LINE_LEN]);
        prop_assert!(!lines[1].is_truncated());
        prop_assert_eq!(lines[1].as_bytes(), body.as_slice());
    }

    /// Decoding arbitrary bytes never panics.
    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..600)) {
        let _ = HostCommand::decode(&bytes);
    }
}

#[test]
fn framing_survives_split_reads() {
    let stream = b"{\"type\":\"GetVersion\"}\n{\"type\":\"ListFiles\"}\r\n";
    let mut framer = LineFramer::new();
    let mut commands = Vec::new();
    for chunk in stream.chunks(3) {
        framer.feed_bytes(chunk, |line| commands.push(HostCommand::decode(line.as_bytes())));
    }
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], Ok(HostCommand::GetVersion));
    assert!(matches!(commands[1], Ok(HostCommand::ListFiles { .. })));
}
