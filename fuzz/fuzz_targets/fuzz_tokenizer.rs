#![no_main]

use libfuzzer_sys::fuzz_target;
use radiomote::console::{tokenize, MAX_TOKENS};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    let tokens = tokenize(line);
    assert!(tokens.len() <= MAX_TOKENS);
    for tok in &tokens {
        assert!(!tok.is_empty());
        assert!(!tok.contains(char::is_whitespace));
    }
});
