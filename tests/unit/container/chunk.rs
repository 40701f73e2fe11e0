use super::*;

fn stream(chunks: &[(ChunkType, &[u8])]) -> Vec<u8> {
    let mut w = ChunkWriter::new(Vec::new()).unwrap();
    for (ty, data) in chunks {
        w.write_chunk(*ty, data).unwrap();
    }
    w.into_inner()
}

#[test]
fn writer_emits_signature_and_standard_crc() {
    let bytes = stream(&[(ChunkType::IEND, &[])]);
    assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    // IEND with empty payload always carries crc ae426082.
    assert_eq!(
        &bytes[8..],
        &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
    );
}

#[test]
fn reads_back_chunks_in_order_then_ends_cleanly() {
    let bytes = stream(&[
        (ChunkType::IHDR, b"0123456789abc"),
        (ChunkType::tRNS, &[0]),
        (ChunkType::IEND, &[]),
    ]);
    let mut r = ChunkReader::new(bytes.as_slice()).unwrap();
    let types: Vec<_> = std::iter::from_fn(|| r.next_chunk().unwrap())
        .map(|c| c.ty)
        .collect();
    assert_eq!(types, vec![ChunkType::IHDR, ChunkType::tRNS, ChunkType::IEND]);
    assert_eq!(r.chunks_read(), 3);
    assert!(r.next_chunk().unwrap().is_none());
}

#[test]
fn iterator_yields_payloads() {
    let bytes = stream(&[(ChunkType::PLTE, &[1, 2, 3])]);
    let chunks: Vec<_> = ChunkReader::new(bytes.as_slice())
        .unwrap()
        .collect::<SpritePackResult<_>>()
        .unwrap();
    assert_eq!(chunks, vec![Chunk::new(ChunkType::PLTE, vec![1, 2, 3])]);
}

#[test]
fn bad_signature_is_rejected() {
    assert!(ChunkReader::new(&b"GIF89a.."[..]).is_err());
    assert!(ChunkReader::new(&b""[..]).is_err());
    assert!(ChunkReader::new(&PNG_SIGNATURE[..4]).is_err());
}

#[test]
fn crc_mismatch_is_chunk_format_error() {
    let mut bytes = stream(&[(ChunkType::PLTE, &[1, 2, 3])]);
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    let mut r = ChunkReader::new(bytes.as_slice()).unwrap();
    assert!(matches!(
        r.next_chunk(),
        Err(SpritePackError::ChunkFormat(_))
    ));
}

#[test]
fn truncation_anywhere_inside_a_chunk_is_an_error() {
    let bytes = stream(&[(ChunkType::PLTE, &[1, 2, 3, 4, 5, 6])]);
    // Every cut strictly inside the chunk (header, payload or crc) must fail.
    for cut in 9..bytes.len() {
        let mut r = ChunkReader::new(&bytes[..cut]).unwrap();
        assert!(r.next_chunk().is_err(), "cut at {cut} was accepted");
    }
}

#[test]
fn oversized_length_and_bad_tag_are_rejected() {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&0x8000_0000u32.to_be_bytes());
    bytes.extend_from_slice(b"IDAT");
    assert!(ChunkReader::new(bytes.as_slice()).unwrap().next_chunk().is_err());

    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(b"ID1T");
    bytes.extend_from_slice(&0u32.to_be_bytes());
    assert!(ChunkReader::new(bytes.as_slice()).unwrap().next_chunk().is_err());
}

#[test]
fn chunk_type_property_bits() {
    assert!(!ChunkType::IHDR.is_ancillary());
    assert!(ChunkType::tRNS.is_ancillary());
    assert!(!ChunkType::tRNS.is_private());
    assert!(ChunkType::PALETTE_DUMP.is_private());
    assert!(ChunkType::PALETTE_DUMP.is_safe_to_copy());
    assert!(ChunkType::CONTROL_TABLE.is_valid());
    assert!(!ChunkType(*b"abcd").is_valid());
    assert_eq!(ChunkType::CONTROL_TABLE.to_string(), "fsCt");
}
