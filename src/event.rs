/// Events emitted while instances are looked up or constructed.
///
/// These events are passed to the tracing callback set via
/// [`set_trace_callback`](crate::set_trace_callback). The `Clone` derive allows
/// callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use typex::PatternEvent;
///
/// let event = PatternEvent::Initialize { type_name: "app::Config", instance_name: None };
/// assert_eq!(event.to_string(), "initialize { type_name: app::Config }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternEvent {
    /// A constructor body ran for a new instance.
    Initialize {
        /// The type name of the constructed value (e.g., "app::Config")
        type_name: &'static str,
        /// The instance name, for multiton types
        instance_name: Option<String>,
    },

    /// An existing instance was handed out; the passed arguments were discarded.
    Reuse {
        type_name: &'static str,
        instance_name: Option<String>,
    },

    /// Construction was refused with an error.
    Reject {
        type_name: &'static str,
        instance_name: Option<String>,
    },
}

impl PatternEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            PatternEvent::Initialize { type_name, .. }
            | PatternEvent::Reuse { type_name, .. }
            | PatternEvent::Reject { type_name, .. } => *type_name,
        }
    }

    pub fn instance_name(&self) -> Option<&str> {
        match self {
            PatternEvent::Initialize { instance_name, .. }
            | PatternEvent::Reuse { instance_name, .. }
            | PatternEvent::Reject { instance_name, .. } => instance_name.as_deref(),
        }
    }
}

impl std::fmt::Display for PatternEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PatternEvent::Initialize { .. } => "initialize",
            PatternEvent::Reuse { .. } => "reuse",
            PatternEvent::Reject { .. } => "reject",
        };
        match self.instance_name() {
            Some(name) => write!(
                f,
                "{} {{ type_name: {}, instance_name: {} }}",
                label,
                self.type_name(),
                name
            ),
            None => write!(f, "{} {{ type_name: {} }}", label, self.type_name()),
        }
    }
}
