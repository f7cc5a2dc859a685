use std::sync::atomic::{AtomicU64, Ordering};

use super::MessageType;

/// Track TCNet codec metrics without external dependencies.
pub(crate) struct Metrics;

static DECODED_PACKETS: AtomicU64 = AtomicU64::new(0);
static ENCODED_DATAGRAMS: AtomicU64 = AtomicU64::new(0);
static DECODE_ERRORS: AtomicU64 = AtomicU64::new(0);
static TRANSFERS_COMPLETED: AtomicU64 = AtomicU64::new(0);
static TRANSFERS_EXPIRED: AtomicU64 = AtomicU64::new(0);
static TRANSFERS_FAILED: AtomicU64 = AtomicU64::new(0);

struct MessageTypeCounters {
    opt_in: AtomicU64,
    opt_out: AtomicU64,
    status: AtomicU64,
    time_sync: AtomicU64,
    error_notification: AtomicU64,
    request: AtomicU64,
    application: AtomicU64,
    control: AtomicU64,
    text: AtomicU64,
    keyboard: AtomicU64,
    data: AtomicU64,
    artwork: AtomicU64,
    time: AtomicU64,
}

static MESSAGE_COUNTERS: MessageTypeCounters = MessageTypeCounters::new();

impl MessageTypeCounters {
    const fn new() -> Self {
        Self {
            opt_in: AtomicU64::new(0),
            opt_out: AtomicU64::new(0),
            status: AtomicU64::new(0),
            time_sync: AtomicU64::new(0),
            error_notification: AtomicU64::new(0),
            request: AtomicU64::new(0),
            application: AtomicU64::new(0),
            control: AtomicU64::new(0),
            text: AtomicU64::new(0),
            keyboard: AtomicU64::new(0),
            data: AtomicU64::new(0),
            artwork: AtomicU64::new(0),
            time: AtomicU64::new(0),
        }
    }

    fn increment(&self, msg_type: MessageType) {
        use MessageType::*;

        match msg_type {
            OptIn => self.opt_in.fetch_add(1, Ordering::Relaxed),
            OptOut => self.opt_out.fetch_add(1, Ordering::Relaxed),
            Status => self.status.fetch_add(1, Ordering::Relaxed),
            TimeSync => self.time_sync.fetch_add(1, Ordering::Relaxed),
            ErrorNotification => self.error_notification.fetch_add(1, Ordering::Relaxed),
            Request => self.request.fetch_add(1, Ordering::Relaxed),
            ApplicationSpecificPacket | ApplicationSpecificData => {
                self.application.fetch_add(1, Ordering::Relaxed)
            }
            Control => self.control.fetch_add(1, Ordering::Relaxed),
            Text => self.text.fetch_add(1, Ordering::Relaxed),
            Keyboard => self.keyboard.fetch_add(1, Ordering::Relaxed),
            Data => self.data.fetch_add(1, Ordering::Relaxed),
            LowResArtworkImage => self.artwork.fetch_add(1, Ordering::Relaxed),
            Time => self.time.fetch_add(1, Ordering::Relaxed),
        };
    }
}

impl Metrics {
    #[inline]
    pub(crate) fn record_decoded(msg_type: MessageType) {
        DECODED_PACKETS.fetch_add(1, Ordering::Relaxed);
        MESSAGE_COUNTERS.increment(msg_type);
    }

    #[inline]
    pub(crate) fn record_encoded(datagrams: usize) {
        ENCODED_DATAGRAMS.fetch_add(datagrams as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decode_error() {
        DECODE_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_transfer_complete() {
        TRANSFERS_COMPLETED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_transfer_expired() {
        TRANSFERS_EXPIRED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_transfer_failed() {
        TRANSFERS_FAILED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            decoded_packets: DECODED_PACKETS.load(Ordering::Relaxed),
            encoded_datagrams: ENCODED_DATAGRAMS.load(Ordering::Relaxed),
            decode_errors: DECODE_ERRORS.load(Ordering::Relaxed),
            transfers_completed: TRANSFERS_COMPLETED.load(Ordering::Relaxed),
            transfers_expired: TRANSFERS_EXPIRED.load(Ordering::Relaxed),
            transfers_failed: TRANSFERS_FAILED.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of critical counters.
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub decoded_packets: u64,
    pub encoded_datagrams: u64,
    pub decode_errors: u64,
    pub transfers_completed: u64,
    pub transfers_expired: u64,
    pub transfers_failed: u64,
}
