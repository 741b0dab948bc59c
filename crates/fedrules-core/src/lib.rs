pub mod record;
pub mod request;

pub use record::{RuleDetailRecord, field_key};
pub use request::{
    DEFAULT_RULE_URLS, FEDRULES_BASE_URL, ScrapeRequest, build_requests, parse_url_list,
    rule_id_from_url, rule_url,
};
