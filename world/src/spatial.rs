//! Chunked broad-phase index over static geometry.

use std::collections::{BTreeMap, HashMap};

use log::trace;
use maze_dash_core::{ChunkCoord, ConfigError, Rect, RectId, StaticRect};

type Bucket = BTreeMap<RectId, StaticRect>;

/// Largest number of buckets [`SpatialIndex::with_extent`] allocates up front,
/// padding ring included.
pub const MAX_PREALLOCATED_BUCKETS: u64 = 1 << 18;

/// Spatial hash grid answering "what static geometry is near this point".
///
/// Every rectangle is inserted into the 3x3 block of chunks around the chunk
/// containing its center. A point query then only reads the single chunk the
/// point falls in, yet still finds every rectangle whose center chunk lies
/// within Chebyshev distance 1 of it. Results are a conservative superset and
/// callers filter exact overlaps themselves.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    chunk_size: f32,
    buckets: HashMap<ChunkCoord, Bucket>,
    rects: Vec<StaticRect>,
}

impl SpatialIndex {
    /// Creates an empty index without any pre-allocated buckets.
    pub fn new(chunk_size: f32) -> Result<Self, ConfigError> {
        if !chunk_size.is_finite() || chunk_size <= 0.0 {
            return Err(ConfigError::InvalidChunkSize { chunk_size });
        }

        Ok(Self {
            chunk_size,
            buckets: HashMap::new(),
            rects: Vec::new(),
        })
    }

    /// Creates an index covering `rows` x `columns` chunks from the origin.
    ///
    /// Empty buckets are allocated for the covered chunks plus one ring of
    /// padding on every side, so rows `-1..=rows` and columns `-1..=columns`.
    /// Extents needing more than [`MAX_PREALLOCATED_BUCKETS`] are rejected.
    pub fn with_extent(chunk_size: f32, rows: u32, columns: u32) -> Result<Self, ConfigError> {
        let mut index = Self::new(chunk_size)?;
        let needed = (u64::from(rows) + 2) * (u64::from(columns) + 2);
        if needed > MAX_PREALLOCATED_BUCKETS {
            return Err(ConfigError::ExtentTooLarge {
                rows,
                columns,
                budget: MAX_PREALLOCATED_BUCKETS,
            });
        }
        index.buckets.reserve(needed as usize);
        let last_row = i32::try_from(rows).unwrap_or(i32::MAX);
        let last_column = i32::try_from(columns).unwrap_or(i32::MAX);
        for row in -1..=last_row {
            for column in -1..=last_column {
                let _ = index.buckets.entry(ChunkCoord::new(row, column)).or_default();
            }
        }
        Ok(index)
    }

    /// Edge length of a single chunk in world units.
    #[must_use]
    pub const fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Chunk containing the provided point.
    #[must_use]
    pub fn chunk_of(&self, x: f32, y: f32) -> ChunkCoord {
        ChunkCoord::containing(x, y, self.chunk_size)
    }

    /// Registers immutable geometry and returns it paired with its new id.
    ///
    /// Identifiers ascend in insertion order; inserting identical geometry
    /// twice yields two distinct entries.
    pub fn add_static_rect(&mut self, rect: Rect) -> StaticRect {
        let id = RectId::new(self.rects.len() as u32);
        let entry = StaticRect::new(id, rect);
        let center = self.chunk_of(entry.mid_x(), entry.mid_y());

        for chunk in center.neighborhood() {
            let _ = self.buckets.entry(chunk).or_default().insert(id, entry);
        }
        self.rects.push(entry);

        trace!(
            "static rect {} centered in chunk ({}, {})",
            id.get(),
            center.row(),
            center.column()
        );
        entry
    }

    /// Geometry registered near the provided point.
    ///
    /// Reads only the chunk containing the point and never fails: chunks
    /// without a bucket and non-finite points produce an empty result.
    #[must_use]
    pub fn nearby_objects(&self, x: f32, y: f32) -> NearbyObjects<'_> {
        if !x.is_finite() || !y.is_finite() {
            return NearbyObjects { bucket: None };
        }

        NearbyObjects {
            bucket: self.buckets.get(&self.chunk_of(x, y)),
        }
    }

    /// Looks up geometry by identifier.
    #[must_use]
    pub fn get(&self, id: RectId) -> Option<&StaticRect> {
        self.rects.get(id.get() as usize)
    }

    /// Number of rectangles registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Reports whether no geometry has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of allocated buckets, empty ones included.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Read-only view of the geometry stored in one chunk, keyed by id.
#[derive(Clone, Copy, Debug)]
pub struct NearbyObjects<'a> {
    bucket: Option<&'a Bucket>,
}

impl<'a> NearbyObjects<'a> {
    /// Number of rectangles in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bucket.map_or(0, BTreeMap::len)
    }

    /// Reports whether the view holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether the rectangle is part of the view.
    #[must_use]
    pub fn contains(&self, id: RectId) -> bool {
        self.bucket.is_some_and(|bucket| bucket.contains_key(&id))
    }

    /// Looks up a rectangle in the view.
    #[must_use]
    pub fn get(&self, id: RectId) -> Option<&'a StaticRect> {
        self.bucket.and_then(|bucket| bucket.get(&id))
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RectId> + 'a {
        self.bucket.into_iter().flat_map(|bucket| bucket.keys().copied())
    }

    /// Rectangles in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &'a StaticRect> + 'a {
        self.bucket.into_iter().flat_map(|bucket| bucket.values())
    }
}
