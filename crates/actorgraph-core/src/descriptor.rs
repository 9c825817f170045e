/// Anything that can describe an actor to the graph builder.
///
/// Only the name and the message types matter to the graph; paths, tags and
/// the rest stay with the implementor.
pub trait Descriptor {
    fn name(&self) -> &str;

    /// Message types this actor emits, in declaration order.
    fn produces(&self) -> &[String];

    /// Message types this actor reads, in declaration order.
    fn consumes(&self) -> &[String];
}

/// Plain in-memory descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorDef {
    pub name: String,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
}

impl ActorDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_produces<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces.extend(messages.into_iter().map(Into::into));
        self
    }

    pub fn with_consumes<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes.extend(messages.into_iter().map(Into::into));
        self
    }
}

impl Descriptor for ActorDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&self) -> &[String] {
        &self.produces
    }

    fn consumes(&self) -> &[String] {
        &self.consumes
    }
}
