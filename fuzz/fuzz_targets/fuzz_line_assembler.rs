#![no_main]

use libfuzzer_sys::fuzz_target;
use radiomote::console::{tokenize, LineAssembler, LineStatus, MAX_LINE_LENGTH};

// Arbitrary byte streams through the assembler: the buffered line must
// never exceed its bound and every completed line must tokenize.
fuzz_target!(|data: &[u8]| {
    let mut asm = LineAssembler::new();
    let mut echo = String::new();
    for byte in data {
        if asm.feed(*byte, &mut echo) == LineStatus::Complete {
            assert!(asm.as_str().len() <= MAX_LINE_LENGTH - 1);
            let _ = tokenize(asm.as_str());
            asm.clear();
        }
        assert!(asm.len() <= MAX_LINE_LENGTH - 1);
    }
});
