#![no_main]
use libfuzzer_sys::fuzz_target;

use parsekit::{Document, JsonParser, StrSource};

fuzz_target!(|data: &[u8]| {
    // Raw bytes go through the UTF-8 reader, so invalid sequences are
    // exercised as well.
    let from_reader = Document::parse_reader(data);

    if let Ok(s) = std::str::from_utf8(data) {
        // We are looking for panics, and for the two entry points to agree.
        let from_str = Document::parse_str(s);
        assert_eq!(from_str.is_ok(), from_reader.is_ok());

        if let Ok(tree) = from_str {
            // A tree that parsed must survive its own serialization.
            let again = Document::parse_str(&tree.to_text()).unwrap();
            assert_eq!(again.to_text(), tree.to_text());
        }

        let mut parser = JsonParser::new();
        let mut source = StrSource::new(s);
        let _ = parser.tokens(&mut source).count();
    }
});
