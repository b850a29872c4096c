use crate::arena::{ArenaCapacity, ArenaError};
use crate::cluster::ConvexHull;
use crate::engine::{DecompositionEngine, EngineError, VhacdEngine};
use crate::geometry::{MarshalError, Mesh};
use crate::math::Real;
use crate::off;
use crate::parameters::DecompositionParameters;
use crate::registry::{SessionHandle, SessionRegistry};
use crate::session::DecompositionSession;
use crate::AccessError;
use log::{debug, warn};
use std::path::PathBuf;

/// Indicates that no session could be created.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DecompositionError {
    /// The flat input arrays are malformed.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    /// The session arena is too small for this run.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The engine failed to compute a decomposition.
    #[error("Compute failure: {0}")]
    Compute(EngineError),
    /// The engine succeeded without producing any cluster.
    #[error("The decomposition produced no convex hull.")]
    EmptyResult,
    /// The clusters of the session could not be read back.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl From<EngineError> for DecompositionError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Arena(e) => Self::Arena(e),
            e => Self::Compute(e),
        }
    }
}

/// Settings of a [`Decomposer`], shared by all its sessions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DecomposerConfig {
    /// The capacity of the arena given to each session.
    pub arena_capacity: ArenaCapacity,
    /// If set, every input mesh is written to this path as an OFF file before
    /// being decomposed.
    ///
    /// This is a debugging aid: failing to write the file does not fail the
    /// decomposition.
    pub dump_input: Option<PathBuf>,
}

/// Creates, queries, and releases decomposition sessions.
///
/// Every session gets its own engine instance, cloned from the prototype
/// given at construction, and its own arena.
#[derive(Debug)]
pub struct Decomposer<E = VhacdEngine> {
    engine: E,
    config: DecomposerConfig,
    pub(crate) sessions: SessionRegistry<E>,
}

impl Default for Decomposer<VhacdEngine> {
    fn default() -> Self {
        Self::new(VhacdEngine::default())
    }
}

impl<E: DecompositionEngine> Decomposer<E> {
    /// A decomposer cloning `engine` for each session, with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, DecomposerConfig::default())
    }

    /// A decomposer cloning `engine` for each session.
    pub fn with_config(engine: E, config: DecomposerConfig) -> Self {
        Self {
            engine,
            config,
            sessions: SessionRegistry::new(),
        }
    }

    /// The configuration of this decomposer.
    pub fn config(&self) -> &DecomposerConfig {
        &self.config
    }

    /// The number of sessions not freed yet.
    pub fn num_live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Decomposes the mesh described by two flat arrays.
    ///
    /// `verts` holds interleaved `x, y, z` coordinates and `indices` holds
    /// interleaved triangle indices; both lengths must be multiples of 3.
    pub fn decompose(
        &mut self,
        verts: &[Real],
        indices: &[u32],
        params: &DecompositionParameters,
    ) -> Result<SessionHandle, DecompositionError> {
        let mesh = Mesh::from_flat(verts, indices)?;
        self.decompose_mesh(&mesh, params)
    }

    /// Decomposes an already marshalled mesh.
    pub fn decompose_mesh(
        &mut self,
        mesh: &Mesh,
        params: &DecompositionParameters,
    ) -> Result<SessionHandle, DecompositionError> {
        let session = self.create_session(mesh, params)?;
        Ok(self.sessions.insert(session))
    }

    /// Runs a decomposition without registering the resulting session.
    pub(crate) fn create_session(
        &self,
        mesh: &Mesh,
        params: &DecompositionParameters,
    ) -> Result<DecompositionSession<E>, DecompositionError> {
        if let Some(path) = &self.config.dump_input {
            debug!("dumping decomposition input to {}", path.display());
            if let Err(e) = off::write_off_file(mesh, path) {
                warn!("failed to dump the input mesh to {}: {}", path.display(), e);
            }
        }

        DecompositionSession::create(
            self.engine.clone(),
            mesh,
            params,
            self.config.arena_capacity,
        )
    }

    /// The session referenced by `handle`.
    pub fn session(&self, handle: &SessionHandle) -> Option<&DecompositionSession<E>> {
        self.sessions.get(handle)
    }

    /// Releases a session: its engine instance, its clusters, its arena and
    /// its registry slot.
    ///
    /// Returns `false` if the session was already released, which can only
    /// happen for handles rebuilt from their raw form.
    pub fn free(&mut self, handle: SessionHandle) -> bool {
        match self.sessions.remove(handle) {
            Some(session) => {
                drop(session);
                true
            }
            None => false,
        }
    }

    /// Decomposes a mesh and copies every resulting hull out of the session.
    ///
    /// The session is freed before returning, whether the extraction
    /// succeeded or not.
    pub fn decompose_to_convex_hulls(
        &mut self,
        verts: &[Real],
        indices: &[u32],
        params: &DecompositionParameters,
    ) -> Result<Vec<ConvexHull>, DecompositionError> {
        let handle = self.decompose(verts, indices, params)?;
        let hulls = self.extract_convex_hulls(&handle);
        let _ = self.free(handle);
        Ok(hulls?)
    }

    fn extract_convex_hulls(&self, handle: &SessionHandle) -> Result<Vec<ConvexHull>, AccessError> {
        let num_hulls = self.convex_hull_count(handle)?;
        let mut hulls = Vec::with_capacity(num_hulls);

        for i in 0..num_hulls {
            let mut verts = vec![0.0; self.vertex_count(handle, i)?];
            let mut indices = vec![0; self.index_count(handle, i)?];
            self.convex_verts_and_indexes(handle, i, &mut verts, &mut indices)?;
            hulls.push(ConvexHull::from_flat(&verts, indices));
        }

        Ok(hulls)
    }
}
