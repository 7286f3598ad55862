//! Tests for the content normalizer
