//! Integration tests for codecs generated from `templates/demo.msg`.
//!
//! The build script generates the demo packets twice, once in template order
//! and once with keyword sorting, so both layouts can be checked against the
//! runtime offset calculator.

#![allow(dead_code)]

mod demo {
    include!(concat!(env!("OUT_DIR"), "/demo_packets.rs"));
}

mod demo_sorted {
    include!(concat!(env!("OUT_DIR"), "/demo_packets_sorted.rs"));
}

use demo::*;
use proptest::prelude::*;
use tmplwire::core::{Error, Frequency, Quaternion, TemplatePacket, Uuid, Vector3, Vector3d, Vector4};
use tmplwire::schema::{
    DEFAULT_PAYLOAD_OFFSET, FieldType, ParseOptions, Template, block_repeat_count, field_offset,
    packet_size,
};

const DEMO_TEMPLATE: &str = include_str!("../templates/demo.msg");

fn runtime_template(sort: bool) -> Template {
    Template::parse(DEMO_TEMPLATE, ParseOptions::new().sorted(sort)).expect("Failed to parse")
}

/// Prepends the transport header bytes the runtime skips.
fn datagram(payload: &[u8]) -> Vec<u8> {
    let mut raw = vec![0u8; DEFAULT_PAYLOAD_OFFSET];
    raw.extend_from_slice(payload);
    raw
}

fn object(id: u32, texture: &[u8], offset: i16) -> ObjectUpdateObjectDataBlock {
    ObjectUpdateObjectDataBlock {
        id,
        position: Vector3d {
            x: 128.0,
            y: 64.5,
            z: 22.25,
        },
        material: vec![1, 2, 3, 4],
        texture_entry: texture.to_vec(),
        scale: Vector4 {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            w: 0.0,
        },
        offset,
    }
}

fn neighbor(last_octet: u8, port: u16, name: &[u8]) -> NeighborListNeighborBlockBlock {
    NeighborListNeighborBlockBlock {
        ip: u32::from_le_bytes([10, 0, 0, last_octet]),
        port,
        name: name.to_vec(),
    }
}

#[test]
fn test_high_frequency_payload() {
    let payload = [0x02, 0x04, 0x03, 0x02, 0x01];
    let packet = SimpleValuePacket::from_payload(&payload).unwrap();
    assert_eq!(packet.data.value, 0x0102_0304);
    assert_eq!(packet.to_payload().unwrap(), payload);

    let template = runtime_template(false);
    let raw = datagram(&payload);
    let runtime = template.packet_from_buffer(&raw).unwrap();
    assert_eq!(runtime.name, "SimpleValue");

    let body = template.body(runtime, &raw).unwrap();
    let block = template.keyword("Data").unwrap();
    let field = template.keyword("Value").unwrap();
    let located = field_offset(runtime, body, block, field, 0).unwrap();
    assert_eq!(located.offset, Some(0));
    assert_eq!(located.field_type, FieldType::U32);
}

#[test]
fn test_ipport_is_big_endian() {
    let packet = EndpointInfoPacket {
        endpoint: EndpointInfoEndpointBlock {
            port: 8080,
            flags: 0x0102,
        },
    };
    let payload = packet.to_payload().unwrap();
    assert_eq!(payload, [0xFF, 0xFF, 0x00, 0x02, 0x1F, 0x90, 0x02, 0x01]);
    assert_eq!(EndpointInfoPacket::from_payload(&payload).unwrap(), packet);
}

#[test]
fn test_medium_frequency_framing() {
    let packet = AgentUpdatePacket {
        agent_data: AgentUpdateAgentDataBlock {
            agent_id: Uuid([0x11; 16]),
            session_id: Uuid([0x22; 16]),
            body_rotation: Quaternion::IDENTITY,
            camera_center: Vector3 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            far: 64.0,
            control_flags: 0x8000_0001,
            flags: 3,
            sitting: true,
        },
    };
    let payload = packet.to_payload().unwrap();
    assert_eq!(&payload[..2], &[0xFF, 0x01]);
    assert_eq!(
        payload.len(),
        2 + AgentUpdateAgentDataBlock::SIZE.unwrap()
    );
    assert_eq!(AgentUpdateAgentDataBlock::SIZE, Some(16 + 16 + 16 + 12 + 4 + 4 + 1 + 1));
    assert_eq!(AgentUpdatePacket::from_payload(&payload).unwrap(), packet);
}

#[test]
fn test_object_update_round_trip() {
    let packet = ObjectUpdatePacket {
        region_data: ObjectUpdateRegionDataBlock {
            region_handle: 0x0003_E800_0003_E800,
            time_dilation: 65535,
        },
        object_data: vec![object(7, b"abc", -5), object(8, b"hello", 300)],
    };
    let payload = packet.to_payload().unwrap();
    let decoded = ObjectUpdatePacket::from_payload(&payload).unwrap();
    assert_eq!(decoded, packet);
    assert_eq!(ObjectUpdateObjectDataBlock::SIZE, None);
    assert_eq!(ObjectUpdateRegionDataBlock::SIZE, Some(10));
}

#[test]
fn test_neighbor_list_round_trip() {
    let packet = NeighborListPacket {
        neighbor_block: vec![
            neighbor(1, 9000, b"alpha\0"),
            neighbor(2, 9001, b""),
            neighbor(3, 9002, b"gamma\0"),
            neighbor(4, 9003, &[0xde, 0xad]),
        ],
    };
    let payload = packet.to_payload().unwrap();
    // Multiple blocks carry no count byte.
    assert_eq!(&payload[..3], &[0xFF, 0x02, 10]);
    assert_eq!(NeighborListPacket::from_payload(&payload).unwrap(), packet);
}

#[test]
fn test_multiple_block_arity_is_enforced() {
    let packet = NeighborListPacket {
        neighbor_block: vec![neighbor(1, 1, b""), neighbor(2, 2, b""), neighbor(3, 3, b"")],
    };
    assert_eq!(
        packet.to_payload(),
        Err(Error::ArityMismatch {
            block: "NeighborBlock",
            expected: 4,
            actual: 3,
        })
    );
}

#[test]
fn test_variable_block_count_limit() {
    let packet = PacketAckPacket {
        packets: (0..256).map(|id| PacketAckPacketsBlock { id }).collect(),
    };
    assert!(matches!(
        packet.to_payload(),
        Err(Error::ArityMismatch {
            block: "Packets",
            expected: 255,
            actual: 256,
        })
    ));

    let packet = PacketAckPacket {
        packets: (0..255).map(|id| PacketAckPacketsBlock { id }).collect(),
    };
    let payload = packet.to_payload().unwrap();
    assert_eq!(&payload[..5], &[0xFF, 0xFF, 0xFF, 0xFB, 255]);
    assert_eq!(payload.len(), 5 + 255 * 4);
}

#[test]
fn test_variable_field_overflow() {
    let mut packets = vec![
        neighbor(1, 1, &[b'x'; 256]),
        neighbor(2, 2, b""),
        neighbor(3, 3, b""),
        neighbor(4, 4, b""),
    ];
    assert_eq!(
        NeighborListPacket {
            neighbor_block: packets.clone()
        }
        .to_payload(),
        Err(Error::VariableOverflow {
            len: 256,
            max: 255,
            width: 1,
        })
    );
    packets[0].name.truncate(255);
    assert!(
        NeighborListPacket {
            neighbor_block: packets
        }
        .to_payload()
        .is_ok()
    );

    let chat = ChatFromViewerPacket {
        chat_data: ChatFromViewerChatDataBlock {
            message: vec![b'y'; 65536],
            type_: 1,
            channel: 0,
        },
        ..Default::default()
    };
    assert_eq!(
        chat.to_payload(),
        Err(Error::VariableOverflow {
            len: 65536,
            max: 65535,
            width: 2,
        })
    );
}

#[test]
fn test_fixed_field_length_is_enforced() {
    let mut block = object(1, b"", 0);
    block.material = vec![1, 2, 3];
    let packet = ObjectUpdatePacket {
        object_data: vec![block],
        ..Default::default()
    };
    assert_eq!(
        packet.to_payload(),
        Err(Error::FixedLengthMismatch {
            expected: 4,
            actual: 3,
        })
    );
}

#[test]
fn test_truncated_payload() {
    let payload = EndpointInfoPacket::default().to_payload().unwrap();
    assert!(matches!(
        EndpointInfoPacket::from_payload(&payload[..payload.len() - 1]),
        Err(Error::BufferTooShort { .. })
    ));
}

#[test]
fn test_runtime_offsets_match_encoded_bytes() {
    let packet = ObjectUpdatePacket {
        region_data: ObjectUpdateRegionDataBlock {
            region_handle: 42,
            time_dilation: 1,
        },
        object_data: vec![object(7, b"abc", -5), object(8, b"hello", 300)],
    };
    let raw = datagram(&packet.to_payload().unwrap());

    let template = runtime_template(false);
    let runtime = template.packet_from_buffer(&raw).unwrap();
    assert_eq!(runtime.name, "ObjectUpdate");
    let body = template.body(runtime, &raw).unwrap();

    let object_data = template.keyword("ObjectData").unwrap();
    assert_eq!(block_repeat_count(runtime, body, object_data).unwrap(), 2);

    // RegionData (10) + count (1) + first instance (52 + 3), then the
    // second instance up to Offset (50 + 5).
    let offset_keyword = template.keyword("Offset").unwrap();
    let located = field_offset(runtime, body, object_data, offset_keyword, 1).unwrap();
    let at = located.offset.unwrap();
    assert_eq!(at, 10 + 1 + 55 + 55);
    assert_eq!(i16::from_le_bytes([body[at], body[at + 1]]), 300);

    let id_keyword = template.keyword("ID").unwrap();
    let first = field_offset(runtime, body, object_data, id_keyword, 0).unwrap();
    assert_eq!(first.offset, Some(11));
    assert_eq!(body[11], 7);

    assert_eq!(packet_size(runtime, body).unwrap(), body.len());
    assert_eq!(body.len(), 10 + 1 + 55 + 57);
}

#[test]
fn test_packet_type_dispatch() {
    assert_eq!(PacketType::from_command(1, Frequency::High), PacketType::StartPingCheck);
    assert_eq!(PacketType::from_command(2, Frequency::Medium), PacketType::NeighborList);
    assert_eq!(PacketType::from_command(3, Frequency::Low), PacketType::ChatFromViewer);
    assert_eq!(PacketType::from_command(0xFFFB, Frequency::Low), PacketType::PacketAck);
    assert_eq!(PacketType::from_command(0xFFFB, Frequency::Fixed), PacketType::PacketAck);
    assert_eq!(PacketType::from_command(99, Frequency::High), PacketType::Default);
    assert_eq!(PacketType::default(), PacketType::Default);

    assert_eq!(PacketType::ALL.len(), 12);
    assert_eq!(PacketType::ALL[0], PacketType::StartPingCheck);
    assert_eq!(PacketType::OpenCircuit.name(), "OpenCircuit");
    assert_eq!(PacketType::Default.to_string(), "Default");
}

#[test]
fn test_any_packet_decode() {
    let ack = PacketAckPacket {
        packets: vec![PacketAckPacketsBlock { id: 17 }, PacketAckPacketsBlock { id: 18 }],
    };
    let payload = ack.to_payload().unwrap();
    let decoded = PacketType::decode(&payload).unwrap();
    assert_eq!(decoded.packet_type(), PacketType::PacketAck);
    assert_eq!(decoded, AnyPacket::PacketAck(ack));
    assert_eq!(decoded.to_payload().unwrap(), payload);

    assert_eq!(
        PacketType::decode(&[0xFF, 0x07]),
        Err(Error::UnknownCommand {
            frequency: "Medium",
            id: 7,
        })
    );
}

#[test]
fn test_command_mismatch() {
    let ping = StartPingCheckPacket::default().to_payload().unwrap();
    assert!(matches!(
        SimpleValuePacket::from_payload(&ping),
        Err(Error::CommandMismatch {
            expected: 2,
            actual: 1,
            ..
        })
    ));
}

#[test]
fn test_packet_display() {
    let packet = SimpleValuePacket {
        data: SimpleValueDataBlock { value: 0x0102_0304 },
    };
    assert_eq!(
        packet.to_string(),
        "--- SimpleValue ---\n-- Data --\nValue: 16909060\n"
    );

    let circuit = OpenCircuitPacket {
        circuit_info: OpenCircuitCircuitInfoBlock {
            ip: u32::from_le_bytes([192, 168, 1, 20]),
            port: 13000,
        },
    };
    let text = AnyPacket::OpenCircuit(circuit).to_string();
    assert!(text.contains("IP: 192.168.1.20"));
    assert!(text.contains("Port: 13000"));

    let neighbors = NeighborListPacket {
        neighbor_block: vec![
            neighbor(1, 1, b"alpha\0"),
            neighbor(2, 2, b""),
            neighbor(3, 3, b""),
            neighbor(4, 4, &[0xde, 0xad]),
        ],
    };
    let text = neighbors.to_string();
    assert!(text.contains("-- NeighborBlock [0] --\n"));
    assert!(text.contains("-- NeighborBlock [3] --\n"));
    assert!(text.contains("Name: alpha\n"));
    assert!(text.contains("Name: dead\n"));
}

#[test]
fn test_sorted_layout_follows_keyword_order() {
    assert!(!demo::TEMPLATE_SORTED);
    assert!(demo_sorted::TEMPLATE_SORTED);

    let agent_id = Uuid([0xAB; 16]);
    let unsorted = demo::SortProbePacket {
        extra: demo::SortProbeExtraBlock {
            zeta: 9,
            value: 0x0A0B_0C0D,
        },
        agent_data: demo::SortProbeAgentDataBlock { agent_id },
    };
    let payload = unsorted.to_payload().unwrap();
    assert_eq!(&payload[4..9], &[9, 0x0D, 0x0C, 0x0B, 0x0A]);
    assert_eq!(&payload[9..], &agent_id.0);

    let sorted = demo_sorted::SortProbePacket {
        extra: demo_sorted::SortProbeExtraBlock {
            zeta: 9,
            value: 0x0A0B_0C0D,
        },
        agent_data: demo_sorted::SortProbeAgentDataBlock { agent_id },
    };
    let payload = sorted.to_payload().unwrap();
    assert_eq!(&payload[4..20], &agent_id.0);
    assert_eq!(&payload[20..], &[0x0D, 0x0C, 0x0B, 0x0A, 9]);

    let template = runtime_template(true);
    let raw = datagram(&payload);
    let runtime = template.packet_from_buffer(&raw).unwrap();
    let body = template.body(runtime, &raw).unwrap();
    let extra = template.keyword("Extra").unwrap();
    let zeta = template.keyword("Zeta").unwrap();
    let located = field_offset(runtime, body, extra, zeta, 0).unwrap();
    assert_eq!(located.offset, Some(20));
    assert_eq!(body[20], 9);
}

#[test]
fn test_packet_flags() {
    assert_eq!(ObjectUpdatePacket::NAME, "ObjectUpdate");
    assert_eq!(ObjectUpdatePacket::ID, 4);
    assert_eq!(ObjectUpdatePacket::FREQUENCY, Frequency::Low);
    assert!(ObjectUpdatePacket::TRUSTED);
    assert!(ObjectUpdatePacket::ZEROCODED);
    assert!(!ObjectUpdatePacket::DEPRECATED);

    assert!(LegacyPingPacket::DEPRECATED);
    assert!(AgentUpdatePacket::ZEROCODED);
    assert!(!AgentUpdatePacket::TRUSTED);

    assert_eq!(PacketAckPacket::ID, 0xFFFB);
    assert_eq!(PacketAckPacket::FREQUENCY, Frequency::Fixed);
    assert_eq!(OpenCircuitPacket::ID, 0xFFFC);
}

#[test]
fn test_quaternion_defaults_to_identity() {
    let packet = AgentUpdatePacket::default();
    assert_eq!(packet.agent_data.body_rotation, Quaternion::IDENTITY);
    assert!(!packet.agent_data.sitting);
}

proptest! {
    #[test]
    fn test_runtime_size_matches_generated_codec(
        ids in proptest::collection::vec(any::<u32>(), 0..40),
        textures in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..8),
    ) {
        let template = runtime_template(false);

        let ack = PacketAckPacket {
            packets: ids.iter().map(|&id| PacketAckPacketsBlock { id }).collect(),
        };
        let raw = datagram(&ack.to_payload().unwrap());
        let runtime = template.packet_from_buffer(&raw).unwrap();
        let body = template.body(runtime, &raw).unwrap();
        let packets = template.keyword("Packets").unwrap();
        prop_assert_eq!(block_repeat_count(runtime, body, packets).unwrap(), ids.len());
        prop_assert_eq!(packet_size(runtime, body).unwrap(), body.len());

        let update = ObjectUpdatePacket {
            object_data: textures.iter().map(|t| object(1, t, 0)).collect(),
            ..Default::default()
        };
        let raw = datagram(&update.to_payload().unwrap());
        let runtime = template.packet_from_buffer(&raw).unwrap();
        let body = template.body(runtime, &raw).unwrap();
        prop_assert_eq!(packet_size(runtime, body).unwrap(), body.len());
        prop_assert_eq!(ObjectUpdatePacket::from_payload(&raw[DEFAULT_PAYLOAD_OFFSET..]).unwrap(), update);
    }
}
