//! # tmplwire Bench
//!
//! Fixtures shared by the tmplwire benchmarks: synthetic templates of any
//! size and raw message bodies laid out for them.

use std::fmt::Write;

use tmplwire_core::{Vector3d, WireWriter};

/// Name of the packet built by [`object_body`].
pub const OBJECT_PACKET: &str = "Packet0";

/// Builds a template with `packets` Low packets.
///
/// Every packet has a Single header block, a Multiple 4 block and a
/// Variable block holding a Fixed field and a Variable field, so both the
/// static and the data-dependent layout paths are exercised.
#[must_use]
pub fn synthetic_template(packets: usize) -> String {
    let mut text = String::from("// synthetic benchmark template\nversion 2.0\n\n");
    for i in 0..packets {
        // Infallible for String.
        let _ = write!(
            text,
            "{{\n\
             \tPacket{i} Low NotTrusted Zerocoded\n\
             \t{{\n\
             \t\tHeader Single\n\
             \t\t{{\tAgentID\tLLUUID\t}}\n\
             \t\t{{\tSerial\tU32\t}}\n\
             \t}}\n\
             \t{{\n\
             \t\tCorners Multiple 4\n\
             \t\t{{\tHeight\tF32\t}}\n\
             \t}}\n\
             \t{{\n\
             \t\tObjectData Variable\n\
             \t\t{{\tID\tU32\t}}\n\
             \t\t{{\tPosition\tLLVector3d\t}}\n\
             \t\t{{\tMaterial\tFixed 4\t}}\n\
             \t\t{{\tTextureEntry\tVariable 2\t}}\n\
             \t\t{{\tOffset\tS16\t}}\n\
             \t}}\n\
             }}\n\n"
        );
    }
    text
}

/// Builds the body of [`OBJECT_PACKET`] with `instances` ObjectData
/// instances, each carrying `texture_len` bytes of TextureEntry.
#[must_use]
pub fn object_body(instances: u8, texture_len: usize) -> Vec<u8> {
    let mut body = Vec::new();
    let mut writer = WireWriter::new(&mut body);

    writer.write(&tmplwire_core::Uuid([7; 16]));
    writer.write(&42u32);
    for corner in 0..4u8 {
        writer.write(&f32::from(corner));
    }

    writer.write(&instances);
    let texture = vec![0x5A; texture_len.min(usize::from(u16::MAX))];
    for id in 0..instances {
        writer.write(&u32::from(id));
        writer.write(&Vector3d {
            x: 128.0,
            y: 128.0,
            z: 25.0,
        });
        // Lengths match the declarations, so neither write can fail.
        let _ = writer.write_fixed(&[1, 2, 3, 4], 4);
        let _ = writer.write_variable(&texture, 2);
        writer.write(&i16::from(id));
    }
    body
}
