/// VisibilityLump: compressed PVS data as stored in BSP map files.
///
/// Layout (all integers little-endian `i32`):
///
/// ```text
/// [num_clusters]
/// [pvs_offset, pas_offset] * num_clusters
/// ... run-length compressed bit rows ...
/// ```
///
/// A row holds one bit per cluster (`(num_clusters + 7) / 8` bytes).
/// Compression only encodes runs of zero bytes: a `0x00` byte is followed
/// by a count of zero bytes; any other byte is literal. An offset of 0
/// means the compiler produced no vis data for that cluster, in which
/// case everything is visible.
///
/// Rows are decoded on each `pvs_row` call; caching is the caller's job.

use super::map_geometry::{ClusterId, ClusterSet};
use super::visibility_table::VisibilityTable;
use crate::error::{Error, Result};

const SOURCE: &str = "galaxy3d::VisibilityLump";

/// Size of one header integer, in bytes.
const HEADER_INT: usize = 4;

/// Parsed visibility lump (header validated, rows still compressed).
pub struct VisibilityLump {
    data: Vec<u8>,
    num_clusters: usize,
    /// Byte offset of each cluster's compressed PVS row
    pvs_offsets: Vec<usize>,
}

impl VisibilityLump {
    /// Parse the lump header.
    ///
    /// # Errors
    ///
    /// `Error::InvalidVisibilityData` if the header is truncated, the
    /// cluster count is negative, or an offset points outside the lump.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let count = read_i32(&data, 0)?;
        if count < 0 {
            return Err(Error::InvalidVisibilityData(format!("negative cluster count {}", count))
                .logged(SOURCE));
        }
        let num_clusters = count as usize;

        let header_len = num_clusters
            .checked_mul(2 * HEADER_INT)
            .and_then(|offsets| offsets.checked_add(HEADER_INT));
        if header_len.map_or(true, |len| len > data.len()) {
            return Err(Error::InvalidVisibilityData(format!(
                "header of {} clusters does not fit in lump of {} bytes",
                num_clusters, data.len()
            ))
            .logged(SOURCE));
        }

        let mut pvs_offsets = Vec::with_capacity(num_clusters);
        for cluster in 0..num_clusters {
            let base = HEADER_INT + cluster * 2 * HEADER_INT;
            let offset = read_i32(&data, base)?;
            if offset < 0 || (offset != 0 && offset as usize >= data.len()) {
                return Err(Error::InvalidVisibilityData(format!(
                    "cluster {} PVS offset {} outside lump of {} bytes",
                    cluster, offset, data.len()
                ))
                .logged(SOURCE));
            }
            pvs_offsets.push(offset as usize);
        }

        Ok(Self { data, num_clusters, pvs_offsets })
    }

    /// Encode explicit rows into lump bytes (PAS offsets mirror PVS).
    ///
    /// Used to produce lumps for generated maps; compiled maps come
    /// with their own lump.
    pub fn encode(rows: &[Vec<ClusterId>]) -> Result<Vec<u8>> {
        let num_clusters = rows.len();
        let row_bytes = row_size(num_clusters);
        let header_len = HEADER_INT + num_clusters * 2 * HEADER_INT;

        let mut body = Vec::new();
        let mut offsets = Vec::with_capacity(num_clusters);
        for row in rows {
            let mut bits = vec![0u8; row_bytes];
            for &cluster in row {
                if cluster < 0 || cluster as usize >= num_clusters {
                    return Err(Error::InvalidCluster(cluster).logged(SOURCE));
                }
                bits[cluster as usize >> 3] |= 1 << (cluster & 7);
            }
            offsets.push(header_len + body.len());
            compress_row(&bits, &mut body);
        }

        let mut data = Vec::with_capacity(header_len + body.len());
        data.extend_from_slice(&(num_clusters as i32).to_le_bytes());
        for offset in offsets {
            data.extend_from_slice(&(offset as i32).to_le_bytes());
            data.extend_from_slice(&(offset as i32).to_le_bytes());
        }
        data.extend_from_slice(&body);
        Ok(data)
    }

    /// Decode the raw bit row of `cluster` into `out` (`row_size` bytes).
    fn decompress_row(&self, cluster: usize, out: &mut Vec<u8>) -> Result<()> {
        let row_bytes = row_size(self.num_clusters);
        out.clear();

        let offset = self.pvs_offsets[cluster];
        if offset == 0 {
            out.resize(row_bytes, 0xff);
            return Ok(());
        }

        let mut input = offset;
        while out.len() < row_bytes {
            let Some(&byte) = self.data.get(input) else {
                return Err(self.truncated(cluster));
            };
            if byte != 0 {
                out.push(byte);
                input += 1;
                continue;
            }

            let Some(&run) = self.data.get(input + 1) else {
                return Err(self.truncated(cluster));
            };
            input += 2;
            let mut run = run as usize;
            if out.len() + run > row_bytes {
                crate::engine_warn!(SOURCE, "Vis decompression overrun in cluster {} row, clipping", cluster);
                run = row_bytes - out.len();
            }
            out.resize(out.len() + run, 0);
        }
        Ok(())
    }

    fn truncated(&self, cluster: usize) -> Error {
        Error::InvalidVisibilityData(format!("row of cluster {} runs past end of lump", cluster))
            .logged(SOURCE)
    }
}

impl VisibilityTable for VisibilityLump {
    fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    fn pvs_row(&self, cluster: ClusterId) -> Result<ClusterSet> {
        if cluster < 0 || cluster as usize >= self.num_clusters {
            return Err(Error::InvalidCluster(cluster).logged(SOURCE));
        }

        let mut bits = Vec::with_capacity(row_size(self.num_clusters));
        self.decompress_row(cluster as usize, &mut bits)?;

        let row = (0..self.num_clusters)
            .filter(|&c| bits[c >> 3] & (1 << (c & 7)) != 0)
            .map(|c| c as ClusterId)
            .collect();
        Ok(row)
    }
}

fn row_size(num_clusters: usize) -> usize {
    (num_clusters + 7) >> 3
}

fn read_i32(data: &[u8], at: usize) -> Result<i32> {
    data.get(at..at + HEADER_INT)
        .and_then(|bytes| bytes.try_into().ok())
        .map(i32::from_le_bytes)
        .ok_or_else(|| {
            Error::InvalidVisibilityData(format!("header truncated at byte {}", at)).logged(SOURCE)
        })
}

/// Append the zero-run compressed form of `bits` to `out`.
fn compress_row(bits: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < bits.len() {
        if bits[i] != 0 {
            out.push(bits[i]);
            i += 1;
            continue;
        }
        let mut run = 0usize;
        while i < bits.len() && bits[i] == 0 && run < u8::MAX as usize {
            run += 1;
            i += 1;
        }
        out.push(0);
        out.push(run as u8);
    }
}

#[cfg(test)]
#[path = "visibility_lump_tests.rs"]
mod tests;
