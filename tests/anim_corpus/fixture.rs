//! Synthetic `ANIM.DAT` builder for facade tests.

/// One stream token.
pub(super) enum Token {
	Lit(u8),
	Copy(usize, usize),
}

/// Encodes `tokens` as a sprite block.
pub(super) fn sprite_block(width: u8, height: u8, tokens: &[Token]) -> Vec<u8> {
	let groups = tokens.len() / 8;
	let (group_count, tail_bits) = if groups == 0 {
		(1, 0)
	} else {
		(groups, tokens.len() % 8)
	};

	let mut out = vec![width, height];
	out.extend_from_slice(&((group_count - 1) as u16).to_le_bytes());
	out.push(tail_bits as u8);
	for chunk in tokens.chunks(8) {
		let flag = chunk
			.iter()
			.enumerate()
			.filter(|(_, t)| matches!(t, Token::Copy(..)))
			.fold(0u8, |flag, (i, _)| flag | (0x80 >> i));
		out.push(flag);
		for token in chunk {
			match *token {
				Token::Lit(value) => out.push(value),
				Token::Copy(length, distance) => {
					let word = ((distance as u16) << 4) | (length - 3) as u16;
					out.extend_from_slice(&word.to_le_bytes());
				}
			}
		}
	}
	out
}

/// Builds a file from `(name, frames, views, references, sprite blocks)`.
pub(super) fn build(animations: &[(&str, u8, u8, Vec<[u8; 4]>, Vec<Vec<u8>>)]) -> Vec<u8> {
	let blocks: Vec<Vec<u8>> = animations
		.iter()
		.map(|(_, frames, views, references, sprites)| {
			let mut block = vec![*frames, *views, 0, 0];
			for reference in references {
				block.extend_from_slice(reference);
			}
			let mut offset = sprites.len() * 2;
			for sprite in sprites {
				block.extend_from_slice(&(offset as u16).to_le_bytes());
				offset += sprite.len();
			}
			for sprite in sprites {
				block.extend_from_slice(sprite);
			}
			block
		})
		.collect();

	let mut offset = 2 + 14 * (animations.len() + 1);
	let total = offset + blocks.iter().map(Vec::len).sum::<usize>();

	let mut data = (animations.len() as u16).to_le_bytes().to_vec();
	for ((name, frames, ..), block) in animations.iter().zip(&blocks) {
		let mut raw = [0u8; 8];
		raw[..name.len()].copy_from_slice(name.as_bytes());
		data.extend_from_slice(&raw);
		data.extend_from_slice(&u16::from(*frames).to_be_bytes());
		data.extend_from_slice(&(offset as u32).to_le_bytes());
		offset += block.len();
	}
	data.extend_from_slice(&[0u8; 10]);
	data.extend_from_slice(&(total as u32).to_le_bytes());
	for block in blocks {
		data.extend_from_slice(&block);
	}
	data
}
