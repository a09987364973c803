//! # vres-schema
//!
//! The resume schema engine. It holds the editor data model and the
//! transformations between the shapes a resume takes:
//!
//! - [`normalize`]: raw persisted or imported section data into canonical
//!   [`SectionItem`]s, rebuilding credential selections from stored links.
//! - [`transform`]: editor document to signed-ready [`VcDocument`] (with
//!   credential inlining and evidence URLs) and back.
//! - [`import`]: arbitrary import payloads into a [`ResumeDocument`].
//! - [`fingerprint`]: change detection over the significant fields.
//!
//! Every operation is a pure function over in-memory values. Data-shape
//! problems are reported as [`TransformWarning`]s next to the output, never
//! as errors.

pub mod document;
pub mod duration;
pub mod evidence;
pub mod fingerprint;
pub mod import;
pub mod item;
pub mod normalize;
pub mod section;
pub mod transform;
pub mod vc;
pub mod warning;

pub use document::{Contact, ResumeDocument, Section, SocialLinks};
pub use duration::{calculate_duration, calculate_duration_at};
pub use evidence::{EvidenceMap, FileEntry, FileRegistry, FileResolver, DRIVE_CONTENT_URL};
pub use fingerprint::{fingerprint, fingerprint_digest, fingerprint_subset};
pub use import::from_imported_payload;
pub use item::{SectionItem, VerificationStatus};
pub use normalize::{normalize_item, normalize_section};
pub use section::{FieldKind, FieldSpec, SectionKind};
pub use transform::{from_vc, from_vc_subject, from_vc_value, to_vc, VcContext};
pub use vc::{ContextValue, CredentialTypeValue, EnvelopeOptions, ResumeSubject, VcDocument};
pub use warning::{TransformWarning, Transformed};
