use ferrous_relay_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use tracing::debug;

/// Upstream answer reduced to what the cache stores.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub answers: Vec<Record>,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub min_ttl: Option<u32>,
}

impl DnsResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    /// Only NOERROR and NXDOMAIN answers are stored. SERVFAIL, REFUSED,
    /// NOTIMP and the rest mean the upstream could not answer.
    pub fn is_cacheable(&self) -> bool {
        matches!(self.rcode, ResponseCode::NoError | ResponseCode::NXDomain)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        Ok(Self::reduce(Self::decode(response_bytes)?))
    }

    /// Parse `response_bytes` as the reply to `request_bytes`.
    ///
    /// The reply must be a response carrying the request's ID and the same
    /// first question (name, type and class), otherwise it is rejected as
    /// `InvalidDnsResponse`.
    pub fn parse_reply(
        request_bytes: &[u8],
        response_bytes: &[u8],
    ) -> Result<DnsResponse, DomainError> {
        let response = Self::decode(response_bytes)?;
        Self::check_reply(request_bytes, &response)?;
        Ok(Self::reduce(response))
    }

    /// Same checks as [`ResponseParser::parse_reply`] without building a
    /// [`DnsResponse`].
    pub fn verify_reply(request_bytes: &[u8], response_bytes: &[u8]) -> Result<(), DomainError> {
        let response = Self::decode(response_bytes)?;
        Self::check_reply(request_bytes, &response)
    }

    fn decode(response_bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })
    }

    fn check_reply(request_bytes: &[u8], response: &Message) -> Result<(), DomainError> {
        let request = Message::from_vec(request_bytes).map_err(|e| {
            DomainError::InvalidQuery(format!("Failed to parse upstream query: {}", e))
        })?;

        if response.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "upstream message is not a response".into(),
            ));
        }

        if response.id() != request.id() {
            debug!(
                expected = request.id(),
                received = response.id(),
                "Upstream response ID mismatch"
            );
            return Err(DomainError::InvalidDnsResponse(format!(
                "response ID {} does not match query ID {}",
                response.id(),
                request.id()
            )));
        }

        let Some(asked) = request.queries().first() else {
            return Ok(());
        };
        let answered = response.queries().first().ok_or_else(|| {
            DomainError::InvalidDnsResponse("response carries no question".into())
        })?;

        let same_name =
            normalize(&asked.name().to_ascii()) == normalize(&answered.name().to_ascii());
        if !same_name
            || asked.query_type() != answered.query_type()
            || asked.query_class() != answered.query_class()
        {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response question {} {} does not match query {} {}",
                answered.name(),
                answered.query_type(),
                asked.name(),
                asked.query_type()
            )));
        }

        Ok(())
    }

    fn reduce(message: Message) -> DnsResponse {
        let rcode = message.response_code();
        let truncated = message.truncated();
        let answers = message.answers().to_vec();
        let min_ttl = answers.iter().map(|r| r.ttl()).min();

        debug!(
            rcode = ?rcode,
            answers = answers.len(),
            min_ttl = ?min_ttl,
            truncated = truncated,
            "DNS response parsed"
        );

        DnsResponse {
            answers,
            rcode,
            truncated,
            min_ttl,
        }
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
