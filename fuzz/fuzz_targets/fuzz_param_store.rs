#![no_main]

use libfuzzer_sys::fuzz_target;
use radiomote::console::ports::ParamStore;
use radiomote::store::BlockStore;

// Interpret the input as an operation stream against the journal store;
// compactions and rejections must never corrupt it.
fuzz_target!(|data: &[u8]| {
    let mut store = BlockStore::new_formatted();
    let mut i = 0;
    while i + 2 <= data.len() {
        let id = data[i] % 16 + 1;
        if data[i] & 0x80 != 0 {
            let _ = store.erase_unit(id);
            i += 2;
        } else {
            let len = (data[i + 1] as usize) % 24;
            let end = (i + 2 + len).min(data.len());
            let _ = store.write_unit(id, &data[i + 2..end]);
            i = end.max(i + 2);
        }
    }
    let blocks = store.raw_blocks();
    assert_eq!(blocks[0].bytes.len(), blocks[1].bytes.len());
});
