use crate::objects::ObjectId;

/// Serialized payload of an indirect object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    /// A dictionary or array rendered as PDF text.
    Dictionary(String),
    /// A stream whose `/Length` may disagree with the payload on purpose.
    Stream {
        declared_length: usize,
        data: Vec<u8>,
    },
}

/// A numbered unit of document content. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    id: ObjectId,
    body: ObjectBody,
}

impl IndirectObject {
    pub fn dictionary(id: ObjectId, body: impl Into<String>) -> Self {
        Self {
            id,
            body: ObjectBody::Dictionary(body.into()),
        }
    }

    pub fn stream(id: ObjectId, data: Vec<u8>, declared_length: usize) -> Self {
        Self {
            id,
            body: ObjectBody::Stream {
                declared_length,
                data,
            },
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn number(&self) -> u32 {
        self.id.number()
    }

    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.body, ObjectBody::Stream { .. })
    }

    /// Encoded payload length of a stream object.
    pub fn true_length(&self) -> Option<usize> {
        match &self.body {
            ObjectBody::Stream { data, .. } => Some(data.len()),
            ObjectBody::Dictionary(_) => None,
        }
    }

    /// Value written into the stream's `/Length` key.
    pub fn declared_length(&self) -> Option<usize> {
        match &self.body {
            ObjectBody::Stream {
                declared_length, ..
            } => Some(*declared_length),
            ObjectBody::Dictionary(_) => None,
        }
    }

    /// Render `<n> <g> obj ... endobj` exactly as it lands in the file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} obj\n", self.id.number(), self.id.generation()).into_bytes();
        match &self.body {
            ObjectBody::Dictionary(text) => out.extend_from_slice(text.as_bytes()),
            ObjectBody::Stream {
                declared_length,
                data,
            } => {
                out.extend_from_slice(format!("<< /Length {declared_length} >>\nstream\n").as_bytes());
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            }
        }
        out.extend_from_slice(b"\nendobj\n");
        out
    }
}
