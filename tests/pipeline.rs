mod common;

use common::radio;
use si446x::{Config, DeviceState, NextState, PacketFormat};

#[test]
fn send_packet_prefixes_length_and_truncates() {
    let (mut device, chip) = radio(Config::default());
    let payload: Vec<u8> = (0..50).collect();

    assert_eq!(device.send_packet(&payload, 4, 0x30), Ok(32));

    let chip = chip.borrow();
    assert_eq!(chip.tx_fifo.len(), 33);
    assert_eq!(chip.tx_fifo[0], 32);
    assert_eq!(&chip.tx_fifo[1..], &payload[..32]);
    assert_eq!(chip.frames_with(0x31), vec![vec![0x31, 4, 0x30, 0x00, 33]]);

    // FIFO reset, then the load, then START_TX
    let load = chip.frames.iter().position(|f| f[0] == 0x66).unwrap();
    assert_eq!(chip.frames[load - 1], vec![0x15, 0x01]);
}

#[test]
fn send_packet_respects_configured_maximum() {
    let (mut device, chip) = radio(Config::default().with_max_payload_len(8));

    assert_eq!(device.send_packet(b"short", 0, 0), Ok(5));
    assert_eq!(device.send_packet(b"much too long", 0, 0), Ok(8));

    assert_eq!(chip.borrow().tx_fifo, b"\x08much too".to_vec());
}

#[test]
fn send_packet_never_overflows_fifo() {
    let (mut device, chip) = radio(Config::default().with_max_payload_len(255));

    assert_eq!(device.send_packet(&[0xA5; 100], 0, 0), Ok(59));
    assert_eq!(chip.borrow().tx_fifo.len(), 60);
}

#[test]
fn fixed_packets_have_no_length_byte() {
    let (mut device, chip) = radio(Config::default().with_packet_format(PacketFormat::Fixed(10)));

    assert_eq!(device.send_packet(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 2, 0), Ok(10));
    assert_eq!(chip.borrow().tx_fifo, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(chip.borrow().frames_with(0x31), vec![vec![0x31, 2, 0, 0, 10]]);

    chip.borrow_mut().rx_fifo.extend([9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0xEE]);
    let mut buf = [0u8; 16];
    assert_eq!(device.read_packet(&mut buf), Ok(10));
    assert_eq!(&buf[..10], &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    assert_eq!(chip.borrow().rx_fifo.len(), 1);
}

#[test]
fn read_packet_uses_length_byte() {
    let (mut device, chip) = radio(Config::default());
    chip.borrow_mut().rx_fifo.extend([5, b'h', b'e', b'l', b'l', b'o']);

    let mut buf = [0u8; 32];
    assert_eq!(device.read_packet(&mut buf), Ok(5));
    assert_eq!(&buf[..5], b"hello");
    assert!(buf[5..].iter().all(|&b| b == 0));
}

#[test]
fn corrupted_length_is_clamped_to_fifo() {
    let (mut device, chip) = radio(Config::default());
    chip.borrow_mut().rx_fifo.push_back(200);
    chip.borrow_mut().rx_fifo.extend(core::iter::repeat(0x11).take(63));

    let mut buf = [0u8; 255];
    assert_eq!(device.read_packet(&mut buf), Ok(60));
    assert!(buf[60..].iter().all(|&b| b == 0));
    assert!(chip.borrow().rx_fifo.is_empty());
    assert_eq!(chip.borrow().frames.last(), Some(&vec![0x15, 0x02]));
}

#[test]
fn short_buffer_bounds_the_read() {
    let (mut device, chip) = radio(Config::default());
    chip.borrow_mut().rx_fifo.extend([12; 13]);

    let mut buf = [0u8; 4];
    assert_eq!(device.read_packet(&mut buf), Ok(4));
    assert_eq!(buf, [12; 4]);

    // The rest of the packet is gone, the next packet starts clean
    assert!(chip.borrow().rx_fifo.is_empty());
    chip.borrow_mut().rx_fifo.extend([2, 0xAB, 0xCD]);
    assert_eq!(device.read_packet(&mut buf), Ok(2));
    assert_eq!(&buf[..2], &[0xAB, 0xCD]);
}

#[test]
fn start_rx_flushes_both_fifos_first() {
    let (mut device, chip) = radio(Config::default());
    chip.borrow_mut().tx_fifo.extend([1, 2, 3]);
    chip.borrow_mut().rx_fifo.extend([4, 5, 6]);

    device
        .start_rx(
            7,
            0,
            0,
            NextState::NoChange,
            NextState::State(DeviceState::Ready),
            NextState::State(DeviceState::Rx),
        )
        .unwrap();

    let chip = chip.borrow();
    assert!(chip.tx_fifo.is_empty());
    assert!(chip.rx_fifo.is_empty());

    let sent: Vec<u8> = chip
        .frames
        .iter()
        .map(|f| f[0])
        .filter(|&opcode| opcode != 0x44)
        .collect();
    assert_eq!(sent, vec![0x15, 0x15, 0x32]);
    assert_eq!(chip.frames_with(0x15), vec![vec![0x15, 0x02], vec![0x15, 0x01]]);
    assert_eq!(
        chip.frames_with(0x32),
        vec![vec![0x32, 7, 0, 0, 0, 0x00, 0x03, 0x08]]
    );
    assert_eq!(chip.state, 0x08);
}
