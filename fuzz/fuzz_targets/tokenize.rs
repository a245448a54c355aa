#![no_main]

use libfuzzer_sys::fuzz_target;
use sanitizer::Event;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // Tokenization never fails and never loses track of document order:
    // every event carries only text actually present or derivable from the
    // input, so the scan must terminate without panicking on any input.
    for event in sanitizer::tokenize(input) {
        match event {
            Event::Text(text) => assert!(!text.is_empty(), "empty text event"),
            Event::CharRef(body) => assert!(!body.is_empty(), "empty char ref"),
            Event::EntityRef(name) => assert!(!name.is_empty(), "empty entity ref"),
            _ => {}
        }
    }
});
