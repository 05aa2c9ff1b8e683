//! Replies sent back to clients.
//!
//! Every reply echoes the client's message ID, opcode, RD flag and question
//! section, and always sets RA.

use crate::dns::cache::CacheEntry;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use std::time::Instant;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Answer from a cache entry, TTLs rewritten to the remaining lifetime.
    pub fn answer(request: &Message, entry: &CacheEntry, now: Instant) -> Message {
        let mut response = Self::reply_to(request, entry.response_code);
        response.add_answers(entry.answers_with_remaining_ttl(now));
        response
    }

    /// Empty NOERROR answer for a query the router rejected.
    pub fn reject(request: &Message) -> Message {
        Self::reply_to(request, ResponseCode::NoError)
    }

    /// SERVFAIL for a query turned away by admission control.
    pub fn servfail(request: &Message) -> Message {
        Self::reply_to(request, ResponseCode::ServFail)
    }

    fn reply_to(request: &Message, rcode: ResponseCode) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.set_truncated(false);
        response.set_response_code(rcode);
        response.add_queries(request.queries().iter().cloned());
        response
    }
}
