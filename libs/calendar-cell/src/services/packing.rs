//! Minimum-track packing of minute intervals.
//!
//! Intervals are ordered by start ascending, then by duration descending,
//! then by key, and each one goes to the first track whose last interval
//! has already ended. A cluster is a maximal run of the ordered intervals
//! chained together by overlap; every member reports how many distinct
//! tracks its own cluster uses.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use shared_utils::MinuteSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedInterval<K> {
    pub key: K,
    pub span: MinuteSpan,
    pub track: usize,
    pub cluster: usize,
    pub tracks_in_cluster: usize,
}

/// Packs `intervals` and returns them in placement order.
///
/// The result depends only on the set of `(key, span)` pairs, not on the
/// input order, as long as keys are unique.
pub fn pack_intervals<K>(intervals: impl IntoIterator<Item = (K, MinuteSpan)>) -> Vec<PackedInterval<K>>
where
    K: Ord + Clone,
{
    let mut ordered: Vec<(K, MinuteSpan)> = intervals.into_iter().collect();
    ordered.sort_by(|(key_a, a), (key_b, b)| {
        (a.start, Reverse(a.duration()), key_a).cmp(&(b.start, Reverse(b.duration()), key_b))
    });

    // End minute of the last interval placed on each track
    let mut track_ends: Vec<u32> = Vec::new();
    let mut packed: Vec<PackedInterval<K>> = Vec::with_capacity(ordered.len());

    for (key, span) in ordered {
        let track = match track_ends.iter().position(|&end| end <= span.start) {
            Some(track) => {
                track_ends[track] = span.end;
                track
            }
            None => {
                track_ends.push(span.end);
                track_ends.len() - 1
            }
        };
        packed.push(PackedInterval {
            key,
            span,
            track,
            cluster: 0,
            tracks_in_cluster: 1,
        });
    }

    assign_clusters(&mut packed);
    packed
}

fn assign_clusters<K>(packed: &mut [PackedInterval<K>]) {
    let mut cluster = 0;
    let mut cluster_start = 0;
    let mut cluster_end: Option<u32> = None;

    for index in 0..packed.len() {
        let span = packed[index].span;
        match cluster_end {
            Some(end) if span.start < end => {
                cluster_end = Some(end.max(span.end));
            }
            Some(_) => {
                close_cluster(&mut packed[cluster_start..index]);
                cluster += 1;
                cluster_start = index;
                cluster_end = Some(span.end);
            }
            None => cluster_end = Some(span.end),
        }
        packed[index].cluster = cluster;
    }

    let len = packed.len();
    close_cluster(&mut packed[cluster_start..len]);
}

fn close_cluster<K>(members: &mut [PackedInterval<K>]) {
    let tracks: BTreeSet<usize> = members.iter().map(|m| m.track).collect();
    let count = tracks.len().max(1);
    for member in members {
        member.tracks_in_cluster = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u32, end: u32) -> MinuteSpan {
        MinuteSpan { start, end }
    }

    #[test]
    fn empty_input_packs_to_nothing() {
        let packed: Vec<PackedInterval<u32>> = pack_intervals(Vec::new());
        assert!(packed.is_empty());
    }

    #[test]
    fn overlapping_pair_uses_two_tracks() {
        let packed = pack_intervals(vec![(1, span(480, 540)), (2, span(500, 530))]);

        assert_eq!(packed[0].track, 0);
        assert_eq!(packed[1].track, 1);
        assert!(packed.iter().all(|p| p.tracks_in_cluster == 2 && p.cluster == 0));
    }

    #[test]
    fn touching_intervals_share_a_track_and_split_clusters() {
        let packed = pack_intervals(vec![(1, span(480, 510)), (2, span(510, 540))]);

        assert_eq!(packed[0].track, 0);
        assert_eq!(packed[1].track, 0);
        assert_eq!(packed[0].cluster, 0);
        assert_eq!(packed[1].cluster, 1);
        assert!(packed.iter().all(|p| p.tracks_in_cluster == 1));
    }

    #[test]
    fn longer_interval_goes_first_on_equal_start() {
        let packed = pack_intervals(vec![(1, span(480, 500)), (2, span(480, 600))]);

        assert_eq!(packed[0].key, 2);
        assert_eq!(packed[0].track, 0);
        assert_eq!(packed[1].key, 1);
        assert_eq!(packed[1].track, 1);
    }

    #[test]
    fn freed_track_is_reused_inside_a_cluster() {
        // A spans the morning; B and C follow each other beside it
        let packed = pack_intervals(vec![
            ('a', span(480, 600)),
            ('b', span(490, 520)),
            ('c', span(520, 550)),
        ]);

        let tracks: Vec<usize> = packed.iter().map(|p| p.track).collect();
        assert_eq!(tracks, vec![0, 1, 1]);
        assert!(packed.iter().all(|p| p.tracks_in_cluster == 2));
    }

    #[test]
    fn later_cluster_only_counts_its_own_tracks() {
        let packed = pack_intervals(vec![
            (1, span(480, 540)),
            (2, span(480, 530)),
            (3, span(490, 520)),
            (4, span(600, 630)),
        ]);

        let last = packed.last().unwrap();
        assert_eq!(last.key, 4);
        assert_eq!(last.cluster, 1);
        assert_eq!(last.tracks_in_cluster, 1);
        assert!(packed[..3].iter().all(|p| p.tracks_in_cluster == 3));
    }
}
