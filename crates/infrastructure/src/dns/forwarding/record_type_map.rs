use ferrous_relay_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.code())
    }

    /// Convert hickory RecordType → domain RecordType (for inbound questions)
    pub fn from_hickory(record_type: HickoryRecordType) -> RecordType {
        RecordType::from_code(u16::from(record_type))
    }
}
