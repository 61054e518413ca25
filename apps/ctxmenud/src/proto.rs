//! Wire messages exchanged with the host process.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    #[prost(oneof = "envelope::Message", tags = "1, 2, 3")]
    pub message: ::core::option::Option<envelope::Message>,
}

pub mod envelope {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Message {
        #[prost(message, tag = "1")]
        Request(super::Request),
        #[prost(message, tag = "2")]
        Response(super::Response),
        #[prost(message, tag = "3")]
        Event(super::Event),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub request_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub session_id: ::prost::alloc::string::String,
    #[prost(oneof = "request::Payload", tags = "10, 11, 12, 13, 14, 15")]
    pub payload: ::core::option::Option<request::Payload>,
}

pub mod request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "10")]
        LoadDocument(super::DocumentSnapshot),
        #[prost(message, tag = "11")]
        ContextMenu(super::ContextMenuEvent),
        #[prost(message, tag = "12")]
        PageHide(super::PageHide),
        #[prost(message, tag = "13")]
        RegisterType(super::RegisterType),
        #[prost(message, tag = "14")]
        UnregisterType(super::UnregisterType),
        #[prost(message, tag = "15")]
        ClearPrivateData(super::ClearPrivateData),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(string, tag = "1")]
    pub request_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub session_id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub error: ::core::option::Option<Error>,
    #[prost(oneof = "response::Payload", tags = "10, 13, 14, 15")]
    pub payload: ::core::option::Option<response::Payload>,
}

pub mod response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "10")]
        LoadDocument(super::LoadDocumentResponse),
        #[prost(message, tag = "13")]
        RegisterType(super::RegisterTypeResponse),
        #[prost(message, tag = "14")]
        UnregisterType(super::UnregisterTypeResponse),
        #[prost(message, tag = "15")]
        ClearPrivateData(super::ClearPrivateDataResponse),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(string, tag = "1")]
    pub code: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub session_id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub state: ::core::option::Option<ContextMenuState>,
    #[prost(message, optional, tag = "4")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextMenuState {
    #[prost(string, repeated, tag = "1")]
    pub types: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "2")]
    pub label: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub link_url: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub link_title: ::prost::alloc::string::String,
    #[prost(string, optional, tag = "5")]
    pub link_protocol: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, tag = "6")]
    pub media_url: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub content_type: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub content_disposition: ::prost::alloc::string::String,
    #[prost(string, tag = "9")]
    pub string: ::prost::alloc::string::String,
    #[prost(double, tag = "10")]
    pub x_pos: f64,
    #[prost(double, tag = "11")]
    pub y_pos: f64,
    #[prost(uint32, tag = "12")]
    pub source: u32,
    #[prost(message, optional, tag = "13")]
    pub extras: ::core::option::Option<::prost_types::Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DocumentSnapshot {
    #[prost(string, tag = "1")]
    pub url: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub windows: ::prost::alloc::vec::Vec<WindowSnapshot>,
    #[prost(message, repeated, tag = "3")]
    pub nodes: ::prost::alloc::vec::Vec<NodeSnapshot>,
    #[prost(message, repeated, tag = "4")]
    pub selections: ::prost::alloc::vec::Vec<WindowSelection>,
    #[prost(message, repeated, tag = "5")]
    pub image_cache: ::prost::alloc::vec::Vec<ImageCacheEntry>,
    #[prost(bool, tag = "6")]
    pub image_cache_unavailable: bool,
    #[prost(string, repeated, tag = "7")]
    pub clipboard_flavors: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, repeated, tag = "8")]
    pub cookies: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// A nested browsing window. The top-level window has `parent_id == 0`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WindowSnapshot {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub parent_id: u64,
    #[prost(double, tag = "3")]
    pub offset_x: f64,
    #[prost(double, tag = "4")]
    pub offset_y: f64,
    #[prost(string, tag = "5")]
    pub url: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeSnapshot {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub parent_id: u64,
    #[prost(uint64, tag = "3")]
    pub window_id: u64,
    #[prost(enumeration = "NodeKind", tag = "4")]
    pub kind: i32,
    #[prost(string, tag = "5")]
    pub tag: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub text: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "7")]
    pub attributes: ::prost::alloc::vec::Vec<Attribute>,
    #[prost(string, optional, tag = "8")]
    pub value: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint32, tag = "9")]
    pub selection_start: u32,
    #[prost(uint32, tag = "10")]
    pub selection_end: u32,
    #[prost(bool, tag = "11")]
    pub paused: bool,
    #[prost(bool, tag = "12")]
    pub ended: bool,
    #[prost(string, tag = "13")]
    pub current_src: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WindowSelection {
    #[prost(uint64, tag = "1")]
    pub window_id: u64,
    #[prost(string, tag = "2")]
    pub text: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageCacheEntry {
    #[prost(string, tag = "1")]
    pub uri: ::prost::alloc::string::String,
    #[prost(string, optional, tag = "2")]
    pub content_type: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub content_disposition: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextMenuEvent {
    #[prost(uint64, tag = "1")]
    pub target_node_id: u64,
    #[prost(double, tag = "2")]
    pub client_x: f64,
    #[prost(double, tag = "3")]
    pub client_y: f64,
    #[prost(uint32, tag = "4")]
    pub input_source: u32,
    #[prost(bool, tag = "5")]
    pub default_prevented: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PageHide {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterType {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub requires_type: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub requires_attribute: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnregisterType {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClearPrivateData {
    #[prost(string, tag = "1")]
    pub data: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoadDocumentResponse {
    #[prost(uint32, tag = "1")]
    pub node_count: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterTypeResponse {
    #[prost(uint32, tag = "1")]
    pub registered: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnregisterTypeResponse {
    #[prost(uint32, tag = "1")]
    pub removed: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClearPrivateDataResponse {
    #[prost(bool, tag = "1")]
    pub cleared: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum NodeKind {
    Unspecified = 0,
    Element = 1,
    Text = 2,
}
