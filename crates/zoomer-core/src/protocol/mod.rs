//! Protocol module containing channel identifiers, message types, the payload
//! codec, and the transport framing.

pub mod channels;
pub mod codec;
pub mod frame;
pub mod messages;

pub use channels::{MessageKind, CHANNEL_NAMESPACE};
pub use codec::{decode_inbound, decode_payload, decoder_for, encode_payload, PayloadDecoder, ProtocolError};
pub use frame::{decode_frame, encode_frame, Frame};
pub use messages::RestrictionMessage;
